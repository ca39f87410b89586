//! # Asignador de Tickets
//! src/jobs/allocator.rs
//!
//! Entrega tickets consecutivos a partir de 0 con un `fetch_add` atómico,
//! así dos submissions concurrentes nunca reciben el mismo número.

use crate::jobs::Ticket;
use std::sync::atomic::{AtomicU64, Ordering};

/// Contador atómico de tickets
#[derive(Debug, Default)]
pub struct TicketAllocator {
    next: AtomicU64,
}

impl TicketAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserva el siguiente ticket
    pub fn allocate(&self) -> Ticket {
        Ticket::new(self.next.fetch_add(1, Ordering::SeqCst))
    }

    /// Cuántos tickets se han entregado hasta ahora
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_allocate_sequential() {
        let allocator = TicketAllocator::new();
        assert_eq!(allocator.issued(), 0);

        assert_eq!(allocator.allocate(), Ticket::new(0));
        assert_eq!(allocator.allocate(), Ticket::new(1));
        assert_eq!(allocator.issued(), 2);
    }

    #[test]
    fn test_allocate_concurrent_is_dense() {
        let allocator = Arc::new(TicketAllocator::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                thread::spawn(move || {
                    (0..250).map(|_| allocator.allocate().index()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();

        assert_eq!(all, (0..2000).collect::<Vec<u64>>());
        assert_eq!(allocator.issued(), 2000);
    }
}
