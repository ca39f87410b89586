//! # Ciclo de Vida del Servidor
//! src/lifecycle.rs
//!
//! Máquina de estados del apagado ordenado:
//!
//! ```text
//! Running ──/shutdown──▶ Draining ──jobs drenados──▶ Stopped
//! ```
//!
//! - `Running`: se aceptan conexiones y submissions.
//! - `Draining`: el listener deja de aceptar; las conexiones ya aceptadas
//!   terminan y se espera a los jobs despachados.
//! - `Stopped`: todo drenado (o abandonado tras el timeout).
//!
//! Además lleva la señal de abort con la que los jobs que siguen en su
//! retardo artificial se interrumpen cuando vence el timeout de apagado.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tiempo máximo para la conexión que despierta al `accept()` bloqueado
const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// Estado del servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    Draining,
    Stopped,
}

/// Resultado del apagado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReport {
    /// Todos los jobs terminaron dentro del plazo
    Complete,

    /// Venció el plazo; `remaining` jobs se abandonaron
    Timeout { remaining: usize },
}

struct Flags {
    state: LifecycleState,
    abort: bool,
    wake_addr: Option<SocketAddr>,
}

struct Inner {
    flags: Mutex<Flags>,
    changed: Condvar,
}

/// Controlador del apagado, compartido entre servidor, handlers y jobs
#[derive(Clone)]
pub struct Lifecycle {
    inner: Arc<Inner>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                flags: Mutex::new(Flags {
                    state: LifecycleState::Running,
                    abort: false,
                    wake_addr: None,
                }),
                changed: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Flags> {
        self.inner.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> LifecycleState {
        self.lock().state
    }

    /// `true` mientras se aceptan conexiones y trabajos nuevos
    pub fn is_accepting(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    /// Dirección del listener, para poder despertarlo al apagar
    pub fn set_wake_address(&self, addr: SocketAddr) {
        self.lock().wake_addr = Some(addr);
    }

    /// Inicia el apagado ordenado
    ///
    /// Debe llamarse después de haber enviado la respuesta de `/shutdown`.
    /// Retorna `false` si el apagado ya estaba en curso.
    pub fn request_shutdown(&self) -> bool {
        let wake_addr = {
            let mut flags = self.lock();
            if flags.state != LifecycleState::Running {
                return false;
            }
            flags.state = LifecycleState::Draining;
            flags.wake_addr
        };
        self.inner.changed.notify_all();

        info!("shutdown requested, no longer accepting connections");

        if let Some(addr) = wake_addr {
            Self::wake_listener(addr);
        }

        true
    }

    // El listener está bloqueado en accept(): una conexión propia lo
    // despierta para que vea el estado Draining.
    fn wake_listener(addr: SocketAddr) {
        let target = if addr.ip().is_unspecified() {
            match addr {
                SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::LOCALHOST, addr.port())),
                SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::LOCALHOST, addr.port())),
            }
        } else {
            addr
        };

        match TcpStream::connect_timeout(&target, WAKE_TIMEOUT) {
            Ok(_) => debug!(%target, "listener woken up"),
            Err(e) => warn!(%target, error = %e, "could not wake listener"),
        }
    }

    /// Duerme `delay` salvo que llegue la señal de abort
    ///
    /// Retorna `true` si se abortó.
    pub fn wait_abort(&self, delay: Duration) -> bool {
        let flags = self.lock();

        let (flags, _result) = self
            .inner
            .changed
            .wait_timeout_while(flags, delay, |flags| !flags.abort)
            .unwrap_or_else(PoisonError::into_inner);

        flags.abort
    }

    /// Interrumpe los retardos de los jobs que aún no terminaron
    pub fn abort_outstanding(&self) {
        self.lock().abort = true;
        self.inner.changed.notify_all();
    }

    /// Marca el final del apagado
    pub fn mark_stopped(&self) {
        self.lock().state = LifecycleState::Stopped;
        self.inner.changed.notify_all();
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
