use crate::actor::{spawn_actor_with_shutdown, Actor, ActorHandle, Addr};
use crate::system::{ActorSystem, ShutdownHandle};
use anyhow::Result;
use tokio::sync::broadcast;

/// Spawns actors on a shared [`ActorSystem`] and drives the process until
/// shutdown.
///
/// ```
/// # use anyhow::Result;
/// # use async_trait::async_trait;
/// # use foodtrucks_actors::actor::{Actor, Context};
/// # use foodtrucks_actors::builder::Builder;
/// # struct Quitter;
/// # #[async_trait]
/// # impl Actor for Quitter {
/// #     type Msg = ();
/// #     async fn handle(&mut self, _msg: (), ctx: &mut Context<Self>) -> Result<()> {
/// #         ctx.stop();
/// #         Ok(())
/// #     }
/// # }
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let mut b = Builder::new();
///     let addr = b.spawn("quitter", 4, Quitter);
///     let shutdown = b.shutdown_handle();
///     addr.send(()).await.unwrap();
///     shutdown.signal();
///     b.run_until_ctrl_c().await.unwrap();
/// });
/// ```
pub struct Builder {
    sys: ActorSystem,
    // Subscribed up front so a signal sent before `run_until_ctrl_c` is not lost.
    shutdown_rx: broadcast::Receiver<()>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        let sys = ActorSystem::new();
        let shutdown_rx = sys.shutdown_notifier();
        Self { sys, shutdown_rx }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.sys.shutdown_handle()
    }

    /// Spawn an actor wired to the shutdown broadcast and track its task.
    pub fn spawn<A: Actor>(&mut self, name: &str, mailbox: usize, actor: A) -> Addr<A> {
        let shutdown_rx = self.sys.shutdown_notifier();
        let h: ActorHandle<A> = spawn_actor_with_shutdown(actor, mailbox, Some(shutdown_rx));
        let name = name.to_string();
        self.sys.track(async move {
            let res = h.task.await?;
            tracing::debug!(actor = %name, ok = res.is_ok(), "actor.stopped");
            res
        });
        h.addr
    }

    pub async fn graceful_shutdown(self) -> Result<()> {
        self.sys.graceful_shutdown().await
    }

    /// Block until CTRL-C or a shutdown signal, then perform a graceful
    /// global shutdown.
    pub async fn run_until_ctrl_c(mut self) -> Result<()> {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("ctrl-c received");
            }
            _ = self.shutdown_rx.recv() => {}
        }
        self.sys.graceful_shutdown().await
    }
}
