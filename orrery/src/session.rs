use std::time::Instant;

use anyhow::Context;
use winit::dpi::PhysicalSize;

use crate::{
    coordinator::{Engine, SelectionSink},
    parameters::{BodyParams, EngineConfig, validate},
    render::RenderSink,
};

/// The environment a session runs inside: it owns the event listeners, the
/// frame callback and the rendering resources.
pub trait ViewHost {
    /// Fonts and other assets. Awaited once, before the first frame.
    fn load_assets(&mut self) -> impl Future<Output = anyhow::Result<()>>;

    fn viewport(&self) -> PhysicalSize<u32>;

    fn attach_listeners(&mut self);

    fn detach_listeners(&mut self);

    /// Ask for one more frame callback.
    fn schedule_frame(&mut self);

    fn cancel_frame(&mut self);

    fn release(&mut self);
}

struct Running<H> {
    host: H,
    engine: Engine,
}

/// A running simulation view. Dropping the session tears it down.
pub struct Session<H: ViewHost> {
    running: Option<Running<H>>,
}

impl<H: ViewHost> Session<H> {
    /// Validate the bodies, load assets, then attach listeners and schedule the first frame.
    ///
    /// Without a host the session is inert whatever the bodies: nothing is validated or
    /// attached and teardown is a no-op. If asset loading fails nothing is attached and
    /// the host is released.
    pub async fn start(
        host: Option<H>,
        bodies: &[BodyParams],
        config: EngineConfig,
        sink: Box<dyn SelectionSink>,
    ) -> anyhow::Result<Self> {
        let Some(mut host) = host else {
            log::warn!("no view to attach to, session is inert");
            return Ok(Self { running: None });
        };
        validate(bodies).context("invalid initial conditions")?;

        if let Err(err) = host.load_assets().await {
            host.release();
            return Err(err.context("failed to load assets"));
        }
        let engine = match Engine::new(bodies, config, host.viewport(), sink) {
            Ok(engine) => engine,
            Err(err) => {
                host.release();
                return Err(err);
            }
        };

        host.attach_listeners();
        host.schedule_frame();
        log::info!("session started with {} bodies", bodies.len());
        Ok(Self {
            running: Some(Running { host, engine }),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn engine(&self) -> Option<&Engine> {
        self.running.as_ref().map(|r| &r.engine)
    }

    pub fn engine_mut(&mut self) -> Option<&mut Engine> {
        self.running.as_mut().map(|r| &mut r.engine)
    }

    pub fn host(&self) -> Option<&H> {
        self.running.as_ref().map(|r| &r.host)
    }

    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.running.as_mut().map(|r| &mut r.host)
    }

    /// Run one tick and request the next frame. Returns false once torn down.
    pub fn frame(&mut self, now: Instant, renderer: &mut dyn RenderSink) -> bool {
        let Some(running) = &mut self.running else {
            return false;
        };
        running.engine.tick(now, renderer);
        running.host.schedule_frame();
        true
    }

    /// Stop the frame loop, detach listeners and release the host. Safe to call more than once.
    pub fn teardown(&mut self) {
        let Some(mut running) = self.running.take() else {
            return;
        };
        running.host.cancel_frame();
        running.host.detach_listeners();
        running.host.release();
        log::info!(
            "session torn down after {} ticks",
            running.engine.simulation().ticks()
        );
    }
}

impl<H: ViewHost> Drop for Session<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use cgmath::{Vector3, Zero};
    use futures::executor::block_on;

    use super::*;
    use crate::coordinator::Selection;

    type Events = Rc<RefCell<Vec<&'static str>>>;

    struct MockHost {
        events: Events,
        fail_assets: bool,
    }

    impl ViewHost for MockHost {
        fn load_assets(&mut self) -> impl Future<Output = anyhow::Result<()>> {
            self.events.borrow_mut().push("load");
            let result = if self.fail_assets {
                Err(anyhow::anyhow!("font missing"))
            } else {
                Ok(())
            };
            futures::future::ready(result)
        }

        fn viewport(&self) -> PhysicalSize<u32> {
            PhysicalSize::new(800, 600)
        }

        fn attach_listeners(&mut self) {
            self.events.borrow_mut().push("attach");
        }

        fn detach_listeners(&mut self) {
            self.events.borrow_mut().push("detach");
        }

        fn schedule_frame(&mut self) {
            self.events.borrow_mut().push("schedule");
        }

        fn cancel_frame(&mut self) {
            self.events.borrow_mut().push("cancel");
        }

        fn release(&mut self) {
            self.events.borrow_mut().push("release");
        }
    }

    fn mock_host(fail_assets: bool) -> (MockHost, Events) {
        let events = Events::default();
        (
            MockHost {
                events: events.clone(),
                fail_assets,
            },
            events,
        )
    }

    fn bodies() -> Vec<BodyParams> {
        vec![
            BodyParams::new("Sun", 100.0, 3.0, (0.0, 0.0, 0.0).into(), Vector3::zero(), 0xffff00),
            BodyParams::new(
                "Planet",
                1.0,
                1.0,
                (15.0, 0.0, 0.0).into(),
                (0.0, 0.0, 3.65).into(),
                0xffffff,
            ),
        ]
    }

    fn start(host: Option<MockHost>, bodies: &[BodyParams]) -> anyhow::Result<Session<MockHost>> {
        block_on(Session::start(
            host,
            bodies,
            EngineConfig::default(),
            Box::new(|_: Option<&Selection>| {}),
        ))
    }

    #[test]
    fn start_loads_then_attaches_and_schedules() {
        let (host, events) = mock_host(false);
        let session = start(Some(host), &bodies()).unwrap();
        assert!(session.is_running());
        assert_eq!(*events.borrow(), ["load", "attach", "schedule"]);
    }

    #[test]
    fn missing_host_gives_an_inert_session() {
        let mut session = start(None, &bodies()).unwrap();
        assert!(!session.is_running());
        assert!(session.engine().is_none());
        assert!(!session.frame(Instant::now(), &mut ()));
        session.teardown();
    }

    #[test]
    fn missing_host_skips_validation() {
        let mut bad = bodies();
        bad[0].mass = 0.0;
        let session = start(None, &bad).unwrap();
        assert!(!session.is_running());
    }

    #[test]
    fn asset_failure_attaches_nothing() {
        let (host, events) = mock_host(true);
        let err = start(Some(host), &bodies()).err().unwrap();
        assert!(format!("{err:#}").contains("font missing"));
        assert_eq!(*events.borrow(), ["load", "release"]);
    }

    #[test]
    fn invalid_bodies_are_rejected_before_loading() {
        let (host, events) = mock_host(false);
        let mut bad = bodies();
        bad[1].radius = -1.0;
        assert!(start(Some(host), &bad).is_err());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn frames_tick_and_reschedule() {
        let (host, events) = mock_host(false);
        let mut session = start(Some(host), &bodies()).unwrap();
        assert!(session.frame(Instant::now(), &mut ()));
        assert!(session.frame(Instant::now(), &mut ()));
        assert_eq!(session.engine().unwrap().simulation().ticks(), 2);
        assert_eq!(events.borrow().iter().filter(|e| **e == "schedule").count(), 3);
    }

    #[test]
    fn teardown_runs_once_and_on_drop() {
        let (host, events) = mock_host(false);
        let mut session = start(Some(host), &bodies()).unwrap();
        session.teardown();
        session.teardown();
        assert!(!session.frame(Instant::now(), &mut ()));
        drop(session);
        assert_eq!(
            *events.borrow(),
            ["load", "attach", "schedule", "cancel", "detach", "release"]
        );

        let (host, events) = mock_host(false);
        drop(start(Some(host), &bodies()).unwrap());
        assert_eq!(events.borrow()[3..], ["cancel", "detach", "release"]);
    }
}
