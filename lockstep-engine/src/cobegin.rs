use std::thread;

use tracing::trace;

use lockstep_lang::{EngineError, EngineResult, TickResult, Trail};

use crate::block::BlockProcessor;
use crate::processor::EngineCtx;

struct TrailProcessor {
    strong: bool,
    parallel: bool,
    finished: bool,
    body: BlockProcessor,
}

/// Drives the trails of a `cobegin` statement.
///
/// Per tick, trails run in declaration order on the caller thread until
/// the first parallel trail is reached; there the unfinished parallel
/// trails run as one bounded fork-join batch, with the first batch
/// member kept on the caller thread and the batch joined before any
/// later sequential trail is ticked. A trail that completes stays
/// finished and is never ticked again. The statement completes when all
/// strong trails have finished, or, with no strong trails at all, when
/// any weak trail has.
pub(crate) struct CobeginProcessor {
    trails: Vec<TrailProcessor>,
}

impl CobeginProcessor {
    pub(crate) fn new(trails: &[Trail], engine: &EngineCtx) -> Self {
        let trails = trails
            .iter()
            .map(|t| TrailProcessor {
                strong: t.strong,
                parallel: t.parallel,
                finished: false,
                body: BlockProcessor::new(t.stmts.clone(), engine.clone()),
            })
            .collect();
        Self { trails }
    }

    pub(crate) fn tick(&mut self) -> EngineResult<TickResult> {
        let cut = self
            .trails
            .iter()
            .position(|tp| tp.parallel)
            .unwrap_or(self.trails.len());
        let mut outcomes: Vec<(usize, EngineResult<TickResult>)> =
            Vec::with_capacity(self.trails.len());

        // Sequential trails declared ahead of the batch.
        for (idx, tp) in self.trails.iter_mut().enumerate().take(cut) {
            if !tp.finished {
                outcomes.push((idx, tp.body.tick()));
            }
        }

        {
            let mut batch: Vec<(usize, &mut TrailProcessor)> = self
                .trails
                .iter_mut()
                .enumerate()
                .filter(|(_, tp)| tp.parallel && !tp.finished)
                .collect();
            if !batch.is_empty() {
                let (head, rest) = batch.split_at_mut(1);
                let joined = thread::scope(|scope| {
                    let handles: Vec<_> = rest
                        .iter_mut()
                        .map(|(idx, tp)| {
                            let idx = *idx;
                            scope.spawn(move || (idx, tp.body.tick()))
                        })
                        .collect();
                    let (idx, tp) = &mut head[0];
                    let mut joined = vec![(*idx, tp.body.tick())];
                    for handle in handles {
                        joined.push(handle.join().expect("trail thread panicked"));
                    }
                    joined
                });
                outcomes.extend(joined);
            }
        }

        // The batch is joined, so later sequential trails observe its
        // writes within the same tick.
        for (idx, tp) in self.trails.iter_mut().enumerate().skip(cut) {
            if !tp.finished && !tp.parallel {
                outcomes.push((idx, tp.body.tick()));
            }
        }

        for (idx, res) in outcomes {
            match res? {
                TickResult::Wait => {}
                TickResult::Done => {
                    trace!(trail = idx, "trail finished");
                    // Latched out of the schedule; its processor (and
                    // defers) survive until the whole cobegin completes.
                    self.trails[idx].finished = true;
                }
                TickResult::Result(_) => return Err(EngineError::ExitNotAllowed),
            }
        }

        let mut num_strong = 0;
        let mut done_strong = 0;
        let mut done_weak = 0;
        for tp in &self.trails {
            if tp.strong {
                num_strong += 1;
                if tp.finished {
                    done_strong += 1;
                }
            } else if tp.finished {
                done_weak += 1;
            }
        }
        let done = (num_strong > 0 && done_strong == num_strong)
            || (num_strong == 0 && done_weak > 0);
        Ok(if done {
            TickResult::Done
        } else {
            TickResult::Wait
        })
    }

    /// Joint teardown: every trail processor goes down together once the
    /// cobegin completes or is preempted, finished trails included.
    pub(crate) fn teardown(&mut self) {
        for tp in &mut self.trails {
            tp.finished = true;
            tp.body.teardown();
        }
    }
}
