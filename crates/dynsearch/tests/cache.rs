//! Concurrent access to the composer cache through the engine.

use std::sync::{Arc, Barrier};
use std::thread;

use dynsearch::{BuilderCache, Criterion, ExprContext, Operator, SearchEngine, SearchTemplate};

struct Invoice;
struct Customer;

struct Search<T> {
    criteria: Vec<Criterion>,
    _target: std::marker::PhantomData<T>,
}

impl<T> Search<T> {
    fn new(criteria: Vec<Criterion>) -> Self {
        Search {
            criteria,
            _target: std::marker::PhantomData,
        }
    }
}

impl<T: 'static> SearchTemplate for Search<T> {
    type Target = T;

    fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }
}

#[test]
fn concurrent_searches_share_one_composer_per_type() {
    const THREADS: usize = 24;
    let cache = Arc::new(BuilderCache::new());
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for i in 0..THREADS {
            let engine = SearchEngine::with_cache(Arc::clone(&cache));
            let barrier = &barrier;
            s.spawn(move || {
                barrier.wait();
                let criteria = vec![Criterion::new("amount", Operator::GreaterThan, i).unwrap()];
                if i % 2 == 0 {
                    let clause = engine.where_clause(&Search::<Invoice>::new(criteria)).unwrap();
                    assert_eq!(clause, format!("AND amount > {i}"));
                } else {
                    engine
                        .predicate(&Search::<Customer>::new(criteria), &ExprContext)
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.created(), 2);
}

#[test]
fn composers_are_identical_across_threads() {
    const THREADS: usize = 8;
    let cache = BuilderCache::new();
    let barrier = Barrier::new(THREADS);

    let composers: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    cache.get_composer::<Invoice>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(composers.iter().all(|c| Arc::ptr_eq(c, &composers[0])));
    assert_eq!(cache.created(), 1);
}

#[test]
fn separate_engines_keep_separate_caches() {
    let first = SearchEngine::new();
    let second = SearchEngine::new();
    let search = Search::<Invoice>::new(Vec::new());
    first.where_clause(&search).unwrap();
    assert_eq!(first.cache().created(), 1);
    assert_eq!(second.cache().created(), 0);
}
