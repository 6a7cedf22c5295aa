use std::time::Duration;

/// Key/value parameters attached to a connection URL, e.g. `?hbaud=9600`.
/// A key may appear more than once; insertion order is kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Params(Vec::new())
    }

    /// First value for `key`, or the empty string if it was never set.
    pub fn get(&self, key: &str) -> &str {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.push((key.into(), value.into()));
    }
}

/// A connection target that has already been parsed from its textual form,
/// such as `ax25://ax0/W1AW?digis=RELAY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialUrl {
    /// Selects the dial strategy: `ax25` or `serial-tnc`.
    pub scheme: String,
    /// The local radio port, e.g. an axport name or a serial device path.
    pub host: String,
    /// Callsign of the station to connect to.
    pub target: String,
    /// Digipeaters in the order the connection should be repeated through.
    pub digis: Vec<String>,
    pub params: Params,
    /// Local callsign.
    pub user: Option<String>,
    /// Overrides the dialer's timeout when set.
    pub timeout: Option<Duration>,
}

impl DialUrl {
    pub fn new<S, H, T>(scheme: S, host: H, target: T) -> Self
    where
        S: Into<String>,
        H: Into<String>,
        T: Into<String>,
    {
        DialUrl {
            scheme: scheme.into(),
            host: host.into(),
            target: target.into(),
            digis: Vec::new(),
            params: Params::new(),
            user: None,
            timeout: None,
        }
    }

    pub fn with_digis<I, S>(mut self, digis: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.digis = digis.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_param<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.params.add(key, value);
        self
    }

    pub fn with_user<U: Into<String>>(mut self, user: U) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The local callsign, empty if no user was given.
    pub fn username(&self) -> &str {
        self.user.as_deref().unwrap_or("")
    }

    /// The target callsign followed by ` via ` and the digipeater path, if any.
    pub fn dial_target(&self) -> String {
        if self.digis.is_empty() {
            self.target.clone()
        } else {
            format!("{} via {}", self.target, self.digis.join(" "))
        }
    }
}
