//! Host supervisor heartbeat
//!
//! The kiosk runs as a systemd service with `WatchdogSec=`; it reports
//! `READY=1` once the window is up and `WATCHDOG=1` on every monitor tick
//! over the datagram socket named by `$NOTIFY_SOCKET`.

use std::os::unix::net::UnixDatagram;

/// Receiver of liveness signals.
pub trait Supervisor {
    /// The main window has been shown for the first time.
    fn ready(&self);

    /// One connection-monitor tick happened.
    fn watchdog(&self);
}

/// Supervisor that ignores every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSupervisor;

impl Supervisor for NullSupervisor {
    fn ready(&self) {}

    fn watchdog(&self) {}
}

/// `sd_notify` over `$NOTIFY_SOCKET`. A no-op when the variable is unset.
#[derive(Debug)]
pub struct SystemdNotifier {
    target: Option<String>,
    socket: Option<UnixDatagram>,
}

impl SystemdNotifier {
    /// Read `$NOTIFY_SOCKET` from the environment.
    pub fn from_env() -> Self {
        Self::with_socket_path(std::env::var("NOTIFY_SOCKET").ok())
    }

    pub fn with_socket_path(target: Option<String>) -> Self {
        let target = target.filter(|t| !t.is_empty());
        let socket = match &target {
            Some(_) => match UnixDatagram::unbound() {
                Ok(socket) => Some(socket),
                Err(e) => {
                    tracing::warn!("Cannot create notify socket: {e}");
                    None
                }
            },
            None => None,
        };
        if let Some(path) = &target {
            tracing::debug!("systemd notify socket: {path}");
        }
        Self { target, socket }
    }

    pub fn is_enabled(&self) -> bool {
        self.socket.is_some()
    }

    fn notify(&self, state: &str) {
        let (Some(socket), Some(target)) = (&self.socket, &self.target) else {
            return;
        };

        let sent = match target.strip_prefix('@') {
            Some(name) => send_abstract(socket, name, state),
            None => socket.send_to(state.as_bytes(), target).map(|_| ()),
        };
        if let Err(e) = sent {
            tracing::debug!("sd_notify {state} failed: {e}");
        }
    }
}

#[cfg(target_os = "linux")]
fn send_abstract(socket: &UnixDatagram, name: &str, state: &str) -> std::io::Result<()> {
    use std::os::linux::net::SocketAddrExt;
    use std::os::unix::net::SocketAddr;

    let addr = SocketAddr::from_abstract_name(name.as_bytes())?;
    socket.send_to_addr(state.as_bytes(), &addr).map(|_| ())
}

#[cfg(not(target_os = "linux"))]
fn send_abstract(_socket: &UnixDatagram, _name: &str, _state: &str) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "abstract sockets are Linux only",
    ))
}

impl Supervisor for SystemdNotifier {
    fn ready(&self) {
        self.notify("READY=1");
    }

    fn watchdog(&self) {
        self.notify("WATCHDOG=1");
    }
}
