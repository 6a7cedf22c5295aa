use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::conn::Conn;
use crate::dial::{Dialer, UrlDialer, SCHEME_AX25, SCHEME_SERIAL_TNC};
use crate::error::{Error, Result};
use crate::url::DialUrl;

/// Maps URL schemes to the dialer that handles them.
///
/// An application builds one of these at startup and hands it to whatever
/// code opens connections.
#[derive(Default, Clone)]
pub struct Registry {
    dialers: HashMap<String, Arc<dyn UrlDialer>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            dialers: HashMap::new(),
        }
    }

    /// A registry where `dialer` handles both `ax25` and `serial-tnc`.
    pub fn with_ax25(dialer: Dialer) -> Self {
        let mut registry = Registry::new();
        registry.register_ax25(dialer);
        registry
    }

    pub fn register_ax25(&mut self, dialer: Dialer) {
        let dialer: Arc<dyn UrlDialer> = Arc::new(dialer);
        self.register(SCHEME_AX25, dialer.clone());
        self.register(SCHEME_SERIAL_TNC, dialer);
    }

    /// Set the dialer for `scheme`, replacing any earlier one.
    pub fn register<S: Into<String>>(&mut self, scheme: S, dialer: Arc<dyn UrlDialer>) {
        let scheme = scheme.into();
        debug!(%scheme, "registering dialer");
        self.dialers.insert(scheme, dialer);
    }

    /// Registered schemes, sorted.
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.dialers.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }

    /// Open a connection with whichever dialer handles `url.scheme`.
    pub fn dial(&self, url: &DialUrl) -> Result<Conn> {
        match self.dialers.get(&url.scheme) {
            Some(dialer) => dialer.dial_url(url),
            None => Err(Error::UnsupportedScheme {
                scheme: url.scheme.clone(),
            }),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("schemes", &self.schemes())
            .finish()
    }
}
