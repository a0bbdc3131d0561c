//! Breadcrumb recording

use std::sync::Arc;

use flare_core::{Breadcrumb, Scope};
use tracing::debug;

use crate::options::ClientOptions;

/// Gatekeeper for breadcrumb admission into a scope
///
/// Applies the configured `before_breadcrumb` hook and the capacity bound.
/// A disabled configuration (max 0) and an absent scope both discard the
/// breadcrumb silently; neither is an error.
pub struct BreadcrumbRecorder {
    options: Arc<ClientOptions>,
}

impl BreadcrumbRecorder {
    pub fn new(options: Arc<ClientOptions>) -> Self {
        BreadcrumbRecorder { options }
    }

    pub fn record(&self, breadcrumb: Breadcrumb, scope: Option<&mut Scope>) {
        if self.options.max_breadcrumbs == 0 {
            debug!("breadcrumb capture disabled, dropping breadcrumb");
            return;
        }

        let breadcrumb = match &self.options.before_breadcrumb {
            Some(hook) => match hook(breadcrumb) {
                Some(breadcrumb) => breadcrumb,
                None => {
                    debug!("breadcrumb dropped by before_breadcrumb hook");
                    return;
                }
            },
            None => breadcrumb,
        };

        match scope {
            Some(scope) => scope.add_breadcrumb(breadcrumb, self.options.max_breadcrumbs),
            None => debug!("no scope supplied, discarding breadcrumb"),
        }
    }
}
