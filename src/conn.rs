use std::fmt;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::{Duration, Instant};

use crate::address::Ax25Addr;
use crate::error::{DeadlineKind, Error, Result};

/// A connected byte stream produced by an AX.25 or TNC transport.
pub trait Ax25Stream: Read + Write + Send {
    /// End the session. The default only flushes pending output.
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

// A KISS TNC reached over TCP (e.g. Dire Wolf) hands back a plain socket
impl Ax25Stream for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.flush()?;
        self.shutdown(Shutdown::Both)
    }
}

impl<S: Ax25Stream + ?Sized> Ax25Stream for Box<S> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// The operations generic connection-handling code may use on an AX.25 link,
/// whether or not a connection is actually present.
pub trait NetConn {
    fn local_addr(&self) -> Option<&Ax25Addr>;
    fn remote_addr(&self) -> Option<&Ax25Addr>;
    fn close(&mut self) -> io::Result<()>;

    fn set_deadline(&mut self, _deadline: Instant) -> Result<()> {
        Err(Error::DeadlineNotImplemented(DeadlineKind::ReadWrite))
    }

    fn set_read_deadline(&mut self, _deadline: Instant) -> Result<()> {
        Err(Error::DeadlineNotImplemented(DeadlineKind::Read))
    }

    fn set_write_deadline(&mut self, _deadline: Instant) -> Result<()> {
        Err(Error::DeadlineNotImplemented(DeadlineKind::Write))
    }
}

/// A station that periodically transmits a fixed message, such as a position
/// or an `ID` beacon, from our callsign to a destination like `BEACON via WIDE1-1`.
pub trait Beacon {
    /// Transmit the message once, right away.
    fn now(&mut self) -> io::Result<()>;

    /// Transmit the message every `interval` until told otherwise.
    fn every(&mut self, interval: Duration) -> io::Result<()>;

    fn local_addr(&self) -> Option<&Ax25Addr>;
    fn remote_addr(&self) -> Option<&Ax25Addr>;

    fn message(&self) -> &str;
}

/// An established AX.25 connection.
///
/// The stream is owned exclusively. Reads and writes go straight through to it
/// with no extra buffering or locking, so full-duplex use is exactly as capable
/// as the underlying transport.
pub struct Conn {
    stream: Box<dyn Ax25Stream>,
    local_addr: Ax25Addr,
    remote_addr: Ax25Addr,
}

impl Conn {
    pub fn new(stream: Box<dyn Ax25Stream>, local_addr: Ax25Addr, remote_addr: Ax25Addr) -> Self {
        Conn {
            stream,
            local_addr,
            remote_addr,
        }
    }

    /// Our own callsign. Local addresses never carry a digipeater path.
    pub fn local_addr(&self) -> Option<&Ax25Addr> {
        Some(&self.local_addr)
    }

    /// The peer, including the digipeater path that was requested.
    pub fn remote_addr(&self) -> Option<&Ax25Addr> {
        Some(&self.remote_addr)
    }

    pub fn close(&mut self) -> io::Result<()> {
        self.stream.close()
    }

    /// Always fails: packet radio links cannot abort I/O on a deadline.
    /// Use the dial timeout or close the connection instead.
    pub fn set_deadline(&mut self, deadline: Instant) -> Result<()> {
        NetConn::set_deadline(self, deadline)
    }

    pub fn set_read_deadline(&mut self, deadline: Instant) -> Result<()> {
        NetConn::set_read_deadline(self, deadline)
    }

    pub fn set_write_deadline(&mut self, deadline: Instant) -> Result<()> {
        NetConn::set_write_deadline(self, deadline)
    }
}

impl fmt::Debug for Conn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conn")
            .field("local_addr", &self.local_addr)
            .field("remote_addr", &self.remote_addr)
            .finish_non_exhaustive()
    }
}

impl Read for Conn {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for Conn {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl NetConn for Conn {
    fn local_addr(&self) -> Option<&Ax25Addr> {
        Conn::local_addr(self)
    }

    fn remote_addr(&self) -> Option<&Ax25Addr> {
        Conn::remote_addr(self)
    }

    fn close(&mut self) -> io::Result<()> {
        Conn::close(self)
    }
}

fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "no AX.25 connection")
}

// A connection slot that may be empty. Address lookups on an empty slot give
// `None` instead of failing, and closing empties the slot.
impl NetConn for Option<Conn> {
    fn local_addr(&self) -> Option<&Ax25Addr> {
        self.as_ref().and_then(Conn::local_addr)
    }

    fn remote_addr(&self) -> Option<&Ax25Addr> {
        self.as_ref().and_then(Conn::remote_addr)
    }

    fn close(&mut self) -> io::Result<()> {
        match self.take() {
            Some(mut conn) => conn.close(),
            None => Err(not_connected()),
        }
    }
}
