//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Servidor TCP que maneja múltiples conexiones simultáneas usando threads.
//! Cada conexión se procesa en su propio thread y cada job de hashing en
//! otro (ver `jobs::processor`).
//!
//! ## Apagado
//!
//! 1. El thread de `/shutdown` envía el acuse y recién entonces llama a
//!    `Lifecycle::request_shutdown`, que despierta al `accept()`.
//! 2. El loop deja de aceptar y suelta el listener.
//! 3. Se espera a las conexiones ya aceptadas y luego a los jobs.

use crate::config::Config;
use crate::error::ServerError;
use crate::http::{Request, Response, StatusCode, MAX_REQUEST_BYTES};
use crate::jobs::{handlers as job_handlers, HashService, HashServiceConfig, TaskTracker};
use crate::lifecycle::{Lifecycle, ShutdownReport};
use crate::router::Router;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Tiempo máximo esperando bytes de un cliente
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Tamaño de cada lectura del socket
const READ_CHUNK: usize = 8192;

/// Servidor HTTP/1.0 concurrente del servicio de hashing
pub struct Server {
    config: Config,
    router: Arc<Router<HashService>>,
    service: HashService,
    connections: TaskTracker,
    lifecycle: Lifecycle,
    listener: Option<TcpListener>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let lifecycle = Lifecycle::new();
        let service = HashService::new(HashServiceConfig::from_config(&config), lifecycle.clone());

        Self {
            config,
            router: Arc::new(Self::build_router()),
            service,
            connections: TaskTracker::new("connections"),
            lifecycle,
            listener: None,
        }
    }

    /// Rutas del servicio
    pub fn build_router() -> Router<HashService> {
        let mut router = Router::new();

        router.register("/hash", job_handlers::submit_handler);
        router.register_prefix(job_handlers::RESULT_PREFIX, job_handlers::result_handler);
        router.register("/stats", job_handlers::stats_handler);
        router.register("/shutdown", job_handlers::shutdown_handler);

        router
    }

    /// Abre el listener y retorna la dirección real (útil con puerto 0)
    pub fn bind(&mut self) -> Result<SocketAddr, ServerError> {
        let address = self.config.address();

        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
        let local_addr = listener.local_addr()?;

        self.lifecycle.set_wake_address(local_addr);
        self.listener = Some(listener);

        info!(%local_addr, "server listening");
        Ok(local_addr)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    pub fn service(&self) -> &HashService {
        &self.service
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Atiende conexiones hasta que se pide `/shutdown`, luego drena
    pub fn run(&mut self) -> Result<ShutdownReport, ServerError> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = self.listener.take().ok_or(ServerError::NotBound)?;

        info!("concurrent mode: one thread per connection");

        loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    if !self.lifecycle.is_accepting() {
                        Self::reject(stream);
                        break;
                    }
                    self.spawn_connection(stream, peer);
                }
                Err(e) => {
                    if !self.lifecycle.is_accepting() {
                        break;
                    }
                    error!(error = %e, "failed to accept connection");
                }
            }
        }

        // Desde acá el SO rechaza las conexiones nuevas
        drop(listener);
        info!("listener closed, draining connections");

        let drain_timeout = self.service.config().shutdown_timeout;
        if !self.connections.wait_idle(drain_timeout) {
            warn!(
                tracker = self.connections.name(),
                in_flight = self.connections.in_flight(),
                "connections still open after drain timeout"
            );
        }

        let report = self.service.drain();
        self.lifecycle.mark_stopped();

        info!(?report, submitted = self.service.submitted(), "server stopped");
        Ok(report)
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr) {
        let router = Arc::clone(&self.router);
        let service = self.service.clone();
        let guard = self.connections.track();

        debug!(%peer, "new connection");

        let spawned = thread::Builder::new()
            .name("conn".to_string())
            .spawn(move || {
                let _guard = guard;
                if let Err(e) = Self::handle_connection(stream, &router, &service) {
                    warn!(%peer, error = %e, "connection error");
                }
            });

        if let Err(e) = spawned {
            error!(%peer, error = %e, "could not spawn connection thread");
        }
    }

    // Conexión que llegó entre el pedido de apagado y el cierre del listener
    fn reject(mut stream: TcpStream) {
        let mut response = Response::error(StatusCode::ServiceUnavailable, "server is shutting down");
        Router::<HashService>::add_common_headers(&mut response);

        if let Err(e) = stream.write_all(&response.to_bytes()).and_then(|_| stream.flush()) {
            debug!(error = %e, "could not notify rejected connection");
        }
    }

    /// Lee, enruta y responde un único request
    pub fn handle_connection(
        mut stream: TcpStream,
        router: &Router<HashService>,
        service: &HashService,
    ) -> io::Result<()> {
        let start = Instant::now();
        stream.set_read_timeout(Some(READ_TIMEOUT))?;

        let buffer = Self::read_request(&mut stream)?;
        if buffer.is_empty() {
            debug!("connection closed without data");
            return Ok(());
        }

        let oversized = buffer.len() > MAX_REQUEST_BYTES
            || Request::expected_len(&buffer).is_some_and(|n| n > MAX_REQUEST_BYTES);

        let (response, path) = if oversized {
            let mut response = Response::error(StatusCode::BadRequest, "Invalid request: too large");
            Router::<HashService>::add_common_headers(&mut response);
            (response, None)
        } else {
            match Request::parse(&buffer) {
                Ok(request) => {
                    debug!(method = request.method().as_str(), path = request.path(), "request");
                    (router.route(&request, service), Some(request.path().to_string()))
                }
                Err(e) => {
                    debug!(error = %e, "parse error");
                    let mut response =
                        Response::error(StatusCode::BadRequest, &format!("Invalid request: {}", e));
                    Router::<HashService>::add_common_headers(&mut response);
                    (response, None)
                }
            }
        };

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        debug!(
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "response sent"
        );

        // El acuse ya salió: recién ahora se inicia el apagado
        if path.as_deref() == Some("/shutdown") && response.status().is_success() {
            service.lifecycle().request_shutdown();
        }

        Ok(())
    }

    // Lee hasta tener headers + Content-Length, EOF o pasar el máximo
    fn read_request(stream: &mut TcpStream) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            let n = stream.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);

            // Con un Content-Length por encima del máximo no se espera el body
            if let Some(expected) = Request::expected_len(&buffer) {
                if buffer.len() >= expected || expected > MAX_REQUEST_BYTES {
                    break;
                }
            }
            if buffer.len() > MAX_REQUEST_BYTES {
                break;
            }
        }

        Ok(buffer)
    }
}
