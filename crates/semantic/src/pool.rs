use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::SemanticError;

type Job<M> = Box<dyn FnOnce(&mut M) + Send>;

/// Fixed set of threads, each owning one `M` for its whole life.
///
/// `M` never crosses threads, so it does not have to be `Send`. Callers hand in closures
/// and block until one of the workers has run it against its own resource.
pub(crate) struct WorkerPool<M> {
    sender: Option<Sender<Job<M>>>,
    workers: Vec<JoinHandle<()>>,
}

impl<M: 'static> WorkerPool<M> {
    /// Spawns `size` workers and waits until every one of them has built its resource.
    ///
    /// The first loader error is returned and the already started workers are shut down.
    pub(crate) fn start<L>(name: &str, size: usize, loader: L) -> Result<Self, SemanticError>
    where
        L: Fn(usize) -> Result<M, SemanticError> + Send + Sync + 'static,
    {
        if size == 0 {
            return Err(SemanticError::InvalidConfig(
                "inference_workers must be positive".into(),
            ));
        }

        let (sender, receiver) = mpsc::channel::<Job<M>>();
        let receiver = Arc::new(Mutex::new(receiver));
        let loader = Arc::new(loader);
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), SemanticError>>();

        let mut pool = Self {
            sender: Some(sender),
            workers: Vec::with_capacity(size),
        };
        for index in 0..size {
            let receiver = Arc::clone(&receiver);
            let loader = Arc::clone(&loader);
            let ready = ready_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("{name}-{index}"))
                .spawn(move || match loader(index) {
                    Ok(mut resource) => {
                        let _ = ready.send(Ok(()));
                        drop(ready);
                        work(&receiver, &mut resource);
                    }
                    Err(err) => {
                        let _ = ready.send(Err(err));
                    }
                })?;
            pool.workers.push(handle);
        }
        drop(ready_tx);

        for _ in 0..size {
            match ready_rx.recv() {
                Ok(Ok(())) => {}
                Ok(Err(err)) => return Err(err),
                Err(_) => {
                    return Err(SemanticError::Inference(
                        "inference worker exited during startup".into(),
                    ))
                }
            }
        }
        tracing::debug!(pool = name, workers = size, "worker pool started");
        Ok(pool)
    }

    /// Runs `task` on the next free worker and waits for its result.
    pub(crate) fn run<T, F>(&self, task: F) -> Result<T, SemanticError>
    where
        T: Send + 'static,
        F: FnOnce(&mut M) -> T + Send + 'static,
    {
        let stopped = || SemanticError::Inference("inference worker stopped".into());
        let sender = self.sender.as_ref().ok_or_else(stopped)?;

        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        let job: Job<M> = Box::new(move |resource| {
            let _ = reply_tx.send(task(resource));
        });
        sender.send(job).map_err(|_| stopped())?;
        reply_rx.recv().map_err(|_| stopped())
    }

    pub(crate) fn size(&self) -> usize {
        self.workers.len()
    }
}

fn work<M>(receiver: &Mutex<Receiver<Job<M>>>, resource: &mut M) {
    loop {
        // the lock is released before the job runs so other workers keep pulling
        let job = match receiver.lock() {
            Ok(guard) => guard.recv(),
            Err(_) => return,
        };
        match job {
            Ok(job) => job(resource),
            Err(_) => return,
        }
    }
}

impl<M> Drop for WorkerPool<M> {
    fn drop(&mut self) {
        self.sender.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("inference worker panicked");
            }
        }
    }
}
