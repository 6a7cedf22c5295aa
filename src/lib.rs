//! AX.25 addressing and connection dialing for packet radio applications.
//!
//! This crate sits between an application that wants a byte stream to another
//! station and the transports that can provide one: native AX.25 ports and
//! Kenwood-style TNCs on a serial line.
//!
//! Main features:
//! * Station addresses with SSIDs and digipeater paths, e.g. `W1AW-2 via RELAY WIDE1-1`
//! * One connection type regardless of which transport opened it
//! * Scheme-based dialing: `ax25` and `serial-tnc`
//!
//! Typical use:
//! 1. Implement `dial::Transport` on top of your AX.25 stack and TNC driver.
//! 2. Build a registry at startup: `let registry = Registry::with_ax25(Dialer::new(transport));`
//! 3. Describe the target: `DialUrl::new("ax25", "port1", "W1AW").with_digis(vec!["RELAY"]).with_user("LA5NTA")`
//! 4. Open it: `let conn = registry.dial(&url)?;`
//! 5. Use `Read`/`Write` on the `Conn`, then `close()` it.

/// Station callsigns, SSIDs and digipeater paths.
pub mod address;

/// A transport-independent AX.25 connection.
pub mod conn;

/// Choosing and invoking a transport for a connection URL.
pub mod dial;

/// Errors reported by dialing and connections.
pub mod error;

/// Scheme to dialer lookup.
pub mod registry;

/// Parsed connection targets.
pub mod url;
