use std::fmt;
use std::io;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::address::Ax25Addr;
use crate::conn::{Ax25Stream, Conn};
use crate::error::{Error, Result};
use crate::url::DialUrl;

/// Scheme for native AX.25 ports, e.g. Linux axports.
pub const SCHEME_AX25: &str = "ax25";

/// Scheme for a Kenwood-style TNC attached over a serial line.
pub const SCHEME_SERIAL_TNC: &str = "serial-tnc";

/// Used when neither the URL nor the dialer asks for something else.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);

/// Radio side (HF/VHF) baud rate of a serial TNC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Baudrate(pub u64);

impl Baudrate {
    pub const DEFAULT: Baudrate = Baudrate(1200);

    /// Read an `hbaud` URL parameter. Only a positive integer is accepted.
    pub fn parse_param(value: &str) -> Option<Self> {
        value.parse::<u64>().ok().filter(|&baud| baud > 0).map(Baudrate)
    }
}

impl Default for Baudrate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Baudrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settings handed to the serial TNC driver when dialing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KenwoodConfig {
    /// Baud rate used on the radio link.
    pub hbaud: Baudrate,
}

impl KenwoodConfig {
    pub fn new(hbaud: Baudrate) -> Self {
        KenwoodConfig { hbaud }
    }
}

/// Receives status lines from a serial TNC while it is connecting.
pub type Notifier = Sender<String>;

/// The AX.25 session layer and serial TNC driver that actually open links.
///
/// Implementations block until the link is up or has failed. Any error they
/// return is passed on to the caller of `Dialer` without change.
pub trait Transport: Send + Sync {
    /// Connect through a native AX.25 port.
    fn dial_ax25_timeout(
        &self,
        port: &str,
        mycall: &str,
        target: &str,
        timeout: Duration,
    ) -> io::Result<Box<dyn Ax25Stream>>;

    /// Connect through a Kenwood-style TNC on a serial port.
    fn dial_kenwood(
        &self,
        port: &str,
        mycall: &str,
        target: &str,
        config: KenwoodConfig,
        notifier: Option<Notifier>,
    ) -> io::Result<Box<dyn Ax25Stream>>;
}

/// Something that can open a connection for a `DialUrl`. Registered against
/// one or more schemes in a `Registry`.
pub trait UrlDialer: Send + Sync {
    fn dial_url(&self, url: &DialUrl) -> Result<Conn>;
}

/// Opens AX.25 connections for the `ax25` and `serial-tnc` schemes.
#[derive(Clone)]
pub struct Dialer {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl Dialer {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Dialer {
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Change how long an `ax25` dial may take when the URL does not say.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Open the raw stream for `url` without attaching any addresses.
    pub fn dial_stream(&self, url: &DialUrl) -> Result<Box<dyn Ax25Stream>> {
        let target = url.dial_target();
        let mycall = url.username();

        match url.scheme.as_str() {
            SCHEME_AX25 => {
                let timeout = url.timeout.unwrap_or(self.timeout);
                debug!(port = %url.host, %mycall, %target, ?timeout, "dialing AX.25 port");
                Ok(self
                    .transport
                    .dial_ax25_timeout(&url.host, mycall, &target, timeout)?)
            }
            SCHEME_SERIAL_TNC => {
                let param = url.params.get("hbaud");
                let hbaud = match Baudrate::parse_param(param) {
                    Some(hbaud) => hbaud,
                    None => {
                        if !param.is_empty() {
                            warn!(hbaud = %param, "ignoring invalid hbaud parameter");
                        }
                        Baudrate::DEFAULT
                    }
                };
                debug!(port = %url.host, %mycall, %target, %hbaud, "dialing serial TNC");
                Ok(self.transport.dial_kenwood(
                    &url.host,
                    mycall,
                    &target,
                    KenwoodConfig::new(hbaud),
                    None,
                )?)
            }
            scheme => {
                warn!(%scheme, "no AX.25 dial strategy for scheme");
                Err(Error::UnsupportedScheme {
                    scheme: scheme.to_string(),
                })
            }
        }
    }
}

impl UrlDialer for Dialer {
    /// Dial `url` and wrap the stream with our callsign as the local address
    /// and the target, via the requested digipeaters, as the remote address.
    fn dial_url(&self, url: &DialUrl) -> Result<Conn> {
        let stream = self.dial_stream(url)?;
        let local = Ax25Addr::from_calls::<&str>(url.username(), &[]);
        let remote = Ax25Addr::from_calls(&url.target, url.digis.as_slice());
        debug!(local = %local, remote = %remote, "AX.25 connection established");
        Ok(Conn::new(stream, local, remote))
    }
}

impl fmt::Debug for Dialer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialer")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::address::Address;
    use crate::conn::test::MemoryStream;
    use std::io::{Read, Write};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        Ax25 {
            port: String,
            mycall: String,
            target: String,
            timeout: Duration,
        },
        Kenwood {
            port: String,
            mycall: String,
            target: String,
            config: KenwoodConfig,
            notified: bool,
        },
    }

    /// Records every dial and hands back an in-memory stream, or fails with
    /// the configured error kind.
    #[derive(Default)]
    pub(crate) struct FakeTransport {
        pub(crate) calls: Mutex<Vec<Call>>,
        pub(crate) fail: Option<io::ErrorKind>,
    }

    impl FakeTransport {
        fn respond(&self) -> io::Result<Box<dyn Ax25Stream>> {
            match self.fail {
                Some(kind) => Err(io::Error::new(kind, "link failed")),
                None => Ok(Box::new(MemoryStream::new(b"*** CONNECTED\r"))),
            }
        }

        pub(crate) fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        fn dial_ax25_timeout(
            &self,
            port: &str,
            mycall: &str,
            target: &str,
            timeout: Duration,
        ) -> io::Result<Box<dyn Ax25Stream>> {
            self.calls.lock().unwrap().push(Call::Ax25 {
                port: port.to_string(),
                mycall: mycall.to_string(),
                target: target.to_string(),
                timeout,
            });
            self.respond()
        }

        fn dial_kenwood(
            &self,
            port: &str,
            mycall: &str,
            target: &str,
            config: KenwoodConfig,
            notifier: Option<Notifier>,
        ) -> io::Result<Box<dyn Ax25Stream>> {
            self.calls.lock().unwrap().push(Call::Kenwood {
                port: port.to_string(),
                mycall: mycall.to_string(),
                target: target.to_string(),
                config,
                notified: notifier.is_some(),
            });
            self.respond()
        }
    }

    fn dialer() -> (Arc<FakeTransport>, Dialer) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
        let transport = Arc::new(FakeTransport::default());
        (transport.clone(), Dialer::new(transport))
    }

    fn serial_hbaud(dialer: &Dialer, transport: &FakeTransport, hbaud: Option<&str>) -> Baudrate {
        let mut url = DialUrl::new("serial-tnc", "/dev/ttyUSB0", "W1AW").with_user("LA5NTA");
        if let Some(hbaud) = hbaud {
            url = url.with_param("hbaud", hbaud);
        }
        dialer.dial_stream(&url).unwrap();
        match transport.calls().pop() {
            Some(Call::Kenwood { config, .. }) => config.hbaud,
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_ax25_digi_path() {
        let (transport, dialer) = dialer();
        let url = DialUrl::new("ax25", "port1", "W1AW")
            .with_digis(vec!["RELAY", "WIDE1-1"])
            .with_user("LA5NTA");
        dialer.dial_stream(&url).unwrap();
        assert_eq!(
            transport.calls(),
            vec![Call::Ax25 {
                port: "port1".to_string(),
                mycall: "LA5NTA".to_string(),
                target: "W1AW via RELAY WIDE1-1".to_string(),
                timeout: DEFAULT_TIMEOUT,
            }]
        );
    }

    #[test]
    fn test_ax25_timeout() {
        let (transport, dialer) = dialer();
        let dialer = dialer.with_timeout(Duration::from_secs(10));
        assert_eq!(dialer.timeout(), Duration::from_secs(10));

        let url = DialUrl::new("ax25", "port1", "W1AW");
        dialer.dial_stream(&url).unwrap();
        dialer
            .dial_stream(&url.clone().with_timeout(Duration::from_secs(90)))
            .unwrap();

        let timeouts: Vec<Duration> = transport
            .calls()
            .into_iter()
            .map(|c| match c {
                Call::Ax25 { timeout, mycall, .. } => {
                    assert_eq!(mycall, "");
                    timeout
                }
                other => panic!("unexpected call {:?}", other),
            })
            .collect();
        assert_eq!(timeouts, vec![Duration::from_secs(10), Duration::from_secs(90)]);
    }

    #[test]
    fn test_serial_tnc() {
        let (transport, dialer) = dialer();
        let url = DialUrl::new("serial-tnc", "/dev/ttyUSB0", "W1AW")
            .with_digis(vec!["RELAY"])
            .with_user("LA5NTA")
            .with_param("hbaud", "9600");
        dialer.dial_stream(&url).unwrap();
        assert_eq!(
            transport.calls(),
            vec![Call::Kenwood {
                port: "/dev/ttyUSB0".to_string(),
                mycall: "LA5NTA".to_string(),
                target: "W1AW via RELAY".to_string(),
                config: KenwoodConfig::new(Baudrate(9600)),
                notified: false,
            }]
        );
    }

    #[test]
    fn test_serial_tnc_hbaud() {
        let (transport, dialer) = dialer();
        assert_eq!(serial_hbaud(&dialer, &transport, None), Baudrate(1200));
        assert_eq!(serial_hbaud(&dialer, &transport, Some("9600")), Baudrate(9600));
        assert_eq!(serial_hbaud(&dialer, &transport, Some("300")), Baudrate(300));
        assert_eq!(serial_hbaud(&dialer, &transport, Some("0")), Baudrate(1200));
        assert_eq!(serial_hbaud(&dialer, &transport, Some("-5")), Baudrate(1200));
        assert_eq!(serial_hbaud(&dialer, &transport, Some("abc")), Baudrate(1200));
        assert_eq!(serial_hbaud(&dialer, &transport, Some("")), Baudrate(1200));
        assert_eq!(
            serial_hbaud(&dialer, &transport, Some("5000000000")),
            Baudrate(5_000_000_000)
        );
    }

    #[test]
    fn test_baudrate_parse_param() {
        assert_eq!(Baudrate::parse_param("4800"), Some(Baudrate(4800)));
        assert_eq!(Baudrate::parse_param("5000000000"), Some(Baudrate(5_000_000_000)));
        assert_eq!(Baudrate::parse_param("99999999999999999999"), None);
        assert_eq!(Baudrate::parse_param(""), None);
        assert_eq!(Baudrate::parse_param("0"), None);
        assert_eq!(Baudrate::parse_param("-5"), None);
        assert_eq!(Baudrate::parse_param("1200"), Some(Baudrate(1200)));
        assert_eq!(Baudrate::default(), Baudrate(1200));
        assert_eq!(Baudrate(9600).to_string(), "9600");
    }

    #[test]
    fn test_unsupported_scheme() {
        let (transport, dialer) = dialer();
        let url = DialUrl::new("telnet", "example.com", "W1AW").with_user("LA5NTA");
        assert!(matches!(
            dialer.dial_stream(&url),
            Err(Error::UnsupportedScheme { scheme }) if scheme == "telnet"
        ));
        assert!(matches!(
            dialer.dial_url(&url),
            Err(Error::UnsupportedScheme { .. })
        ));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_transport_error_passed_through() {
        let transport = Arc::new(FakeTransport {
            fail: Some(io::ErrorKind::TimedOut),
            ..FakeTransport::default()
        });
        let dialer = Dialer::new(transport.clone());

        for scheme in &["ax25", "serial-tnc"] {
            let url = DialUrl::new(*scheme, "port1", "W1AW");
            match dialer.dial_url(&url) {
                Err(Error::Transport(e)) => {
                    assert_eq!(e.kind(), io::ErrorKind::TimedOut);
                    assert_eq!(e.to_string(), "link failed");
                }
                other => panic!("unexpected result {:?}", other),
            }
        }
        // Exactly one attempt each, no retries
        assert_eq!(transport.calls().len(), 2);
    }

    #[test]
    fn test_dial_url_wraps_addresses() {
        let (_, dialer) = dialer();
        let url = DialUrl::new("ax25", "port1", "W1AW-2")
            .with_digis(vec!["RELAY", "WIDE1-1"])
            .with_user("LA5NTA-3");
        let mut conn = dialer.dial_url(&url).unwrap();

        let local = conn.local_addr().unwrap();
        assert_eq!(local.address(), &Address::new("LA5NTA", 3));
        assert!(local.digis().is_empty());

        let remote = conn.remote_addr().unwrap();
        assert_eq!(remote.address(), &Address::new("W1AW", 2));
        assert_eq!(
            remote.digis(),
            &[Address::new("RELAY", 0), Address::new("WIDE1", 1)][..]
        );
        assert_eq!(remote.to_string(), "W1AW-2 via RELAY WIDE1-1");

        let mut greeting = String::new();
        conn.read_to_string(&mut greeting).unwrap();
        assert_eq!(greeting, "*** CONNECTED\r");
        conn.write_all(b"FC EM\r").unwrap();
        conn.close().unwrap();
    }
}
