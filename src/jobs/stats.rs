//! # Agregador de Estadísticas
//! src/jobs/stats.rs
//!
//! Calcula `{total, average}` para `/stats`. Nunca promedia datos parciales:
//! si hay jobs en vuelo, bloquea solo al request que pidió las estadísticas
//! hasta que terminen todos, con un timeout acotado.

use crate::jobs::{JobError, JobStore, SiteStats, TicketAllocator};
use std::time::Duration;

/// Estadísticas sobre todos los jobs enviados hasta ahora
///
/// - Sin submissions retorna `{0, 0}` de inmediato.
/// - Si no terminan todos dentro de `timeout` retorna `StatsNotReady`.
pub fn collect(
    allocator: &TicketAllocator,
    store: &JobStore,
    timeout: Duration,
) -> Result<SiteStats, JobError> {
    let total = allocator.issued();

    if total == 0 {
        return Ok(SiteStats { total: 0, average: 0 });
    }

    if !store.wait_for_finished(total, timeout) {
        return Err(JobError::StatsNotReady {
            finished: store.finished_count(),
            total,
        });
    }

    Ok(SiteStats {
        total,
        average: average_micros(&store.completed_durations()),
    })
}

/// Promedio en microsegundos truncado; `0` si no hay duraciones
pub fn average_micros(durations: &[Duration]) -> u64 {
    if durations.is_empty() {
        return 0;
    }

    let total_nanos: u128 = durations.iter().map(Duration::as_nanos).sum();
    let total_micros = total_nanos / 1_000;

    (total_micros / durations.len() as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{JobRecord, Ticket};
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_average_micros() {
        assert_eq!(average_micros(&[]), 0);
        assert_eq!(
            average_micros(&[Duration::from_micros(10), Duration::from_micros(21)]),
            15
        );
        // Se suman nanosegundos antes de truncar
        assert_eq!(
            average_micros(&[Duration::from_nanos(1_500), Duration::from_nanos(1_500)]),
            1
        );
    }

    #[test]
    fn test_collect_empty_is_immediate() {
        let allocator = TicketAllocator::new();
        let store = JobStore::new();

        let start = Instant::now();
        let stats = collect(&allocator, &store, Duration::from_secs(30)).unwrap();

        assert_eq!(stats, SiteStats { total: 0, average: 0 });
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_collect_all_finished() {
        let allocator = TicketAllocator::new();
        let store = JobStore::new();

        for micros in [100, 200] {
            let ticket = allocator.allocate();
            store
                .put(JobRecord::completed(ticket, "d".into(), Duration::from_micros(micros)))
                .unwrap();
        }

        let stats = collect(&allocator, &store, Duration::from_secs(1)).unwrap();
        assert_eq!(stats, SiteStats { total: 2, average: 150 });
    }

    #[test]
    fn test_collect_not_ready_times_out() {
        let allocator = TicketAllocator::new();
        let store = JobStore::new();

        let done = allocator.allocate();
        let _pending = allocator.allocate();
        store
            .put(JobRecord::completed(done, "d".into(), Duration::from_micros(5)))
            .unwrap();

        let err = collect(&allocator, &store, Duration::from_millis(50)).unwrap_err();
        assert_eq!(err, JobError::StatsNotReady { finished: 1, total: 2 });
    }

    #[test]
    fn test_collect_waits_for_pending() {
        let allocator = TicketAllocator::new();
        let store = JobStore::new();
        let ticket = allocator.allocate();

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                store
                    .put(JobRecord::completed(ticket, "d".into(), Duration::from_micros(42)))
                    .unwrap();
            })
        };

        let stats = collect(&allocator, &store, Duration::from_secs(5)).unwrap();
        assert_eq!(stats, SiteStats { total: 1, average: 42 });
        writer.join().unwrap();
    }

    #[test]
    fn test_collect_ignores_failed_durations() {
        let allocator = TicketAllocator::new();
        let store = JobStore::new();

        let ok = allocator.allocate();
        let abandoned = allocator.allocate();
        store
            .put(JobRecord::completed(ok, "d".into(), Duration::from_micros(30)))
            .unwrap();
        store.put(JobRecord::failed(abandoned, "abandoned")).unwrap();

        let stats = collect(&allocator, &store, Duration::from_secs(1)).unwrap();
        assert_eq!(stats, SiteStats { total: 2, average: 30 });
    }

    #[test]
    fn test_ticket_reads() {
        // Un ticket nunca emitido no afecta al total
        let allocator = TicketAllocator::new();
        let store = JobStore::new();
        assert!(store.get(Ticket::new(98)).as_str() == "pending");
        assert_eq!(collect(&allocator, &store, Duration::ZERO).unwrap().total, 0);
    }
}
