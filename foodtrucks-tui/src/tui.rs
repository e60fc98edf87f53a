use crate::{
    controller::{Controller, Effect},
    view,
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::{
    event::Event as CtEvent,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use foodtrucks_actors::{
    FinderMsg, LoadOutcome, NearbyOutcome,
    actor::{Actor, Addr, Context},
    finder::FinderActor,
    system::ShutdownHandle,
};
use foodtrucks_core::{NearbyFailure, NearbyPolicy};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};
use tokio::sync::oneshot;

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub enum TuiMsg {
    InputEvent(CtEvent),
    Tick,
    /// Kick off the initial dataset fetch.
    Load,
    DatasetLoaded(LoadOutcome),
    NearbyDone(NearbyOutcome),
    OpError(String),
    Shutdown,
}

pub struct TuiActor {
    ctl: Controller,

    // deps
    finder: Addr<FinderActor>,

    // terminal
    term: Terminal<CrosstermBackend<Stdout>>,
    tick_rate: Duration,
    last_tick: Instant,
    dirty: bool,
    spin_idx: usize,

    // shutdown coordination
    shutdown: ShutdownHandle,
}

impl TuiActor {
    pub fn new(
        finder: Addr<FinderActor>,
        policy: NearbyPolicy,
        available_limit: usize,
        shutdown: ShutdownHandle,
    ) -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;
        term.clear()?;

        Ok(Self {
            ctl: Controller::new(policy, available_limit),
            finder,
            term,
            tick_rate: Duration::from_millis(80),
            last_tick: Instant::now(),
            dirty: true,
            spin_idx: 0,
            shutdown,
        })
    }

    fn spinner(&self) -> &'static str {
        if self.ctl.state().is_loading() {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }

    fn step_spinner(&mut self) {
        if self.ctl.state().is_loading() {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
            self.dirty = true;
        }
    }

    fn draw(&mut self) -> Result<()> {
        let snap = self.ctl.snapshot(self.spinner());
        view::draw(&mut self.term, &snap)
    }

    /// Hand the effect to the finder and forward its reply to our mailbox.
    /// Run `effect` with a fresh address, or stop when no `Addr` is left.
    fn dispatch_effect(&mut self, effect: Effect, ctx: &mut Context<Self>) {
        match ctx.addr() {
            Some(me) => self.run_effect(effect, me),
            None => ctx.stop(),
        }
    }

    fn run_effect(&mut self, effect: Effect, me: Addr<TuiActor>) {
        match effect {
            Effect::Quit => {
                let _ = me.try_send(TuiMsg::Shutdown);
            }
            Effect::Load => {
                let (tx, rx) = oneshot::channel();
                if self
                    .finder
                    .try_send(FinderMsg::LoadDataset { reply: tx })
                    .is_err()
                {
                    self.ctl.finish_load(Err("dataset worker unavailable".into()));
                    return;
                }
                tokio::spawn(async move {
                    let outcome = rx
                        .await
                        .unwrap_or_else(|_| Err("dataset worker dropped the request".into()));
                    let _ = me.send(TuiMsg::DatasetLoaded(outcome)).await;
                });
            }
            Effect::FindNearby {
                zip_code,
                candidates,
                radius_km,
            } => {
                let (tx, rx) = oneshot::channel();
                let msg = FinderMsg::FindNearby {
                    zip_code,
                    candidates,
                    radius_km,
                    reply: tx,
                };
                if self.finder.try_send(msg).is_err() {
                    tracing::error!("tui.finder_unavailable");
                    self.ctl.finish_nearby(Err(NearbyFailure::Compute));
                    return;
                }
                tokio::spawn(async move {
                    let outcome = rx.await.unwrap_or(Err(NearbyFailure::Compute));
                    let _ = me.send(TuiMsg::NearbyDone(outcome)).await;
                });
            }
        }
    }

    fn restore_terminal(&mut self) {
        disable_raw_mode().ok();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = self.term.show_cursor();
    }
}

#[async_trait]
impl Actor for TuiActor {
    type Msg = TuiMsg;

    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            TuiMsg::InputEvent(ev) => {
                if let CtEvent::Key(k) = ev
                    && let Some(effect) = self.ctl.handle_key(k)
                {
                    self.dispatch_effect(effect, ctx);
                }
                self.dirty = true;
            }
            TuiMsg::Load => {
                let effect = self.ctl.start_load();
                self.dispatch_effect(effect, ctx);
                self.dirty = true;
            }
            TuiMsg::DatasetLoaded(outcome) => {
                self.ctl.finish_load(outcome);
                self.dirty = true;
            }
            TuiMsg::NearbyDone(outcome) => {
                self.ctl.finish_nearby(outcome);
                self.dirty = true;
            }
            TuiMsg::OpError(e) => {
                self.ctl.set_notice(format!("× {e}"));
                self.dirty = true;
            }
            TuiMsg::Tick => {
                self.step_spinner();
                if self.dirty || self.last_tick.elapsed() >= self.tick_rate {
                    self.draw()?;
                    self.last_tick = Instant::now();
                    self.dirty = false;
                }
            }
            TuiMsg::Shutdown => {
                self.restore_terminal();
                self.shutdown.signal();
                ctx.stop();
            }
        }

        Ok(())
    }
}

impl Drop for TuiActor {
    fn drop(&mut self) {
        // Also reached when the actor stops on an error or the shutdown broadcast.
        self.restore_terminal();
    }
}
