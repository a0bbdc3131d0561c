//! Client configuration

use std::fmt;
use std::sync::Arc;

use flare_core::Breadcrumb;

use crate::dsn::Dsn;

/// Default upper bound on breadcrumbs kept per scope
pub const DEFAULT_MAX_BREADCRUMBS: usize = 100;

/// Hook applied to every breadcrumb before admission; returning `None`
/// drops the breadcrumb
pub type BeforeBreadcrumb = Arc<dyn Fn(Breadcrumb) -> Option<Breadcrumb> + Send + Sync>;

/// Static configuration for a [`Client`](crate::Client)
///
/// Read-only from the pipeline's perspective once the client is built.
#[derive(Clone)]
pub struct ClientOptions {
    /// Collector endpoint; `None` leaves the client without a destination
    pub dsn: Option<Dsn>,
    pub server_name: Option<String>,
    pub release: Option<String>,
    pub environment: Option<String>,
    /// Upper bound on breadcrumbs kept per scope; 0 disables recording
    pub max_breadcrumbs: usize,
    pub before_breadcrumb: Option<BeforeBreadcrumb>,
    /// Carry structured `extra` values as-is instead of flattening them to
    /// their JSON string rendering
    pub serialize_all_objects: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            dsn: None,
            server_name: None,
            release: None,
            environment: None,
            max_breadcrumbs: DEFAULT_MAX_BREADCRUMBS,
            before_breadcrumb: None,
            serialize_all_objects: false,
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("dsn", &self.dsn)
            .field("server_name", &self.server_name)
            .field("release", &self.release)
            .field("environment", &self.environment)
            .field("max_breadcrumbs", &self.max_breadcrumbs)
            .field(
                "before_breadcrumb",
                &self.before_breadcrumb.as_ref().map(|_| "<function>"),
            )
            .field("serialize_all_objects", &self.serialize_all_objects)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ClientOptions::default();
        assert_eq!(options.max_breadcrumbs, DEFAULT_MAX_BREADCRUMBS);
        assert!(options.dsn.is_none());
        assert!(!options.serialize_all_objects);
    }

    #[test]
    fn test_debug_masks_callback() {
        let options = ClientOptions {
            before_breadcrumb: Some(Arc::new(|crumb: Breadcrumb| Some(crumb))),
            ..Default::default()
        };
        let rendered = format!("{:?}", options);
        assert!(rendered.contains("<function>"));
    }
}
