use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Name reported for the network that every `Ax25Addr` belongs to.
pub const NETWORK: &str = "AX.25";

/// A station callsign with its secondary station identifier (SSID).
///
/// No case normalisation or character validation is performed. Two addresses are
/// equal only if both the callsign text and the SSID match exactly.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    pub call: String,
    pub ssid: u8,
}

impl Address {
    pub fn new<S: Into<String>>(call: S, ssid: u8) -> Self {
        Address {
            call: call.into(),
            ssid,
        }
    }

    /// Parse an address of the form `CALL` or `CALL-SSID`.
    ///
    /// This never fails. The callsign is taken verbatim from the text before the
    /// first `-`. An SSID that is not a base-10 number in `0..=255` becomes 0.
    pub fn from_string(s: &str) -> Self {
        let mut parts = s.split('-');
        let call = parts.next().unwrap_or_default();
        let ssid = parts
            .next()
            .and_then(|ssid| ssid.parse::<i64>().ok())
            .and_then(|ssid| u8::try_from(ssid).ok())
            .unwrap_or(0);
        Address::new(call, ssid)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ssid {
            0 => write!(f, "{}", self.call),
            ssid => write!(f, "{}-{}", self.call, ssid),
        }
    }
}

impl FromStr for Address {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Address::from_string(s))
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address::from_string(s)
    }
}

/// An endpoint of an AX.25 connection: a station plus the digipeater path used
/// to reach it. The order of `digis` is the order in which they repeat.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Ax25Addr {
    address: Address,
    digis: Vec<Address>,
}

impl Ax25Addr {
    pub fn new(address: Address, digis: Vec<Address>) -> Self {
        Ax25Addr { address, digis }
    }

    /// Build an endpoint from textual callsigns, parsing each leniently.
    pub fn from_calls<S: AsRef<str>>(call: &str, digis: &[S]) -> Self {
        Ax25Addr {
            address: Address::from_string(call),
            digis: digis
                .iter()
                .map(|d| Address::from_string(d.as_ref()))
                .collect(),
        }
    }

    /// The station itself.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Digipeaters in repeat order. Empty for a direct path.
    pub fn digis(&self) -> &[Address] {
        &self.digis
    }

    pub fn network(&self) -> &'static str {
        NETWORK
    }
}

impl From<Address> for Ax25Addr {
    fn from(address: Address) -> Self {
        Ax25Addr::new(address, Vec::new())
    }
}

impl fmt::Display for Ax25Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)?;
        if !self.digis.is_empty() {
            write!(f, " via")?;
        }
        for digi in &self.digis {
            write!(f, " {}", digi)?;
        }
        Ok(())
    }
}
