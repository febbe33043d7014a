use std::time::Instant;

use eframe::egui;

use crate::{coordinator::Engine, transition::ViewState};

pub struct InfoPanel {
    pub last_tick: u64,
    pub last_update: Instant,
    pub tick_rates: [f64; 30],
    pub tick_rate_index: usize,

    pub last_time: f64,
}

impl InfoPanel {
    pub fn new() -> Self {
        Self {
            last_tick: 0,
            last_update: Instant::now(),
            tick_rates: [0.0; 30],
            tick_rate_index: 0,

            last_time: 0.0,
        }
    }

    fn sample_tick_rate(&mut self, tick: u64) -> f64 {
        let upd_time = Instant::now();
        let elapsed = upd_time.duration_since(self.last_update).as_secs_f64();
        let ticks_elapsed = tick.saturating_sub(self.last_tick);

        if elapsed > 0.0 {
            self.tick_rates[self.tick_rate_index] = ticks_elapsed as f64 / elapsed;
            self.tick_rate_index = (self.tick_rate_index + 1) % self.tick_rates.len();
        }

        self.last_tick = tick;
        self.last_update = upd_time;

        self.tick_rates.iter().sum::<f64>() / self.tick_rates.len() as f64
    }

    pub fn render(&mut self, ui: &mut egui::Ui, engine: &Engine, ui_tick: u32) {
        let sim = engine.simulation();
        let avg_tick_rate = self.sample_tick_rate(sim.ticks());

        ui.vertical(|ui| {
            if ui_tick % 10 == 0 {
                self.last_time = sim.elapsed();
            }
            ui.label(format!("Simulated time: {:.2}", self.last_time));
            ui.label(format!("Ticks per second: {avg_tick_rate:.0}"));
            ui.label(format!("Time per tick: {}", sim.delta()));
            ui.label(match engine.state() {
                ViewState::Idle => "Running",
                ViewState::Transitioning { .. } => "Moving camera",
                ViewState::Paused { .. } => "Paused",
            });

            ui.separator();
            ui.monospace(engine.camera_readout());

            ui.separator();
            if let Some(name) = engine.hovered_name() {
                ui.label(format!("Hovering: {name}"));
            }
            if let Some(selection) = engine.selection() {
                ui.label(format!("Selected: {}", selection.name));
            }
        });
    }
}
