//! Chart registry
//!
//! The registry is the engine's process-wide state made explicit: the
//! defaults every chart resolves against, the controller for each chart type,
//! the frame scheduler and the set of live charts.

use std::collections::BTreeMap;
use std::rc::Rc;

use animation::{AnimationScheduler, ColorMixer, FrameClock, FrameRequester, RgbaMixer, TickReport, UpdateMode};
use canvas::Canvas;
use chart_config::{DefaultsRegistry, OptionsResolver};
use serde_json::Value;
use tracing::debug;

use crate::chart::{Chart, ChartHandle};
use crate::controllers::{BarController, DatasetController, DoughnutController, LineController, RadarController};
use crate::error::{ChartError, ChartResult};
use crate::model::{ChartConfig, ChartId};

/// Type-erased access to a live chart
trait ManagedChart {
    fn destroy(&self);
}

impl<C: Canvas + 'static> ManagedChart for ChartHandle<C> {
    fn destroy(&self) {
        ChartHandle::destroy(self);
    }
}

/// Engine state shared by every chart it creates
pub struct ChartRegistry {
    scheduler: AnimationScheduler,
    defaults: Rc<DefaultsRegistry>,
    controllers: BTreeMap<String, Rc<dyn DatasetController>>,
    mixer: Rc<dyn ColorMixer>,
    charts: BTreeMap<ChartId, Box<dyn ManagedChart>>,
}

impl std::fmt::Debug for ChartRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartRegistry")
            .field("chart_types", &self.controllers.keys().collect::<Vec<_>>())
            .field("charts", &self.charts.len())
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl ChartRegistry {
    /// Registry with the standard defaults and the bar, line, radar,
    /// doughnut and pie chart types
    pub fn init(requester: Rc<dyn FrameRequester>, clock: Rc<dyn FrameClock>) -> Self {
        let mut controllers: BTreeMap<String, Rc<dyn DatasetController>> = BTreeMap::new();
        controllers.insert("bar".to_string(), Rc::new(BarController));
        controllers.insert("line".to_string(), Rc::new(LineController));
        controllers.insert("radar".to_string(), Rc::new(RadarController));
        let doughnut: Rc<dyn DatasetController> = Rc::new(DoughnutController);
        controllers.insert("doughnut".to_string(), doughnut.clone());
        controllers.insert("pie".to_string(), doughnut);

        Self {
            scheduler: AnimationScheduler::new(requester, clock),
            defaults: Rc::new(DefaultsRegistry::standard()),
            controllers,
            mixer: Rc::new(RgbaMixer),
            charts: BTreeMap::new(),
        }
    }

    /// Replace the color interpolation used by charts created afterwards
    pub fn with_color_mixer(mut self, mixer: Rc<dyn ColorMixer>) -> Self {
        self.mixer = mixer;
        self
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn defaults(&self) -> &DefaultsRegistry {
        &self.defaults
    }

    /// Merge `overrides` into the global defaults. Charts already created
    /// keep the defaults they were resolved against.
    pub fn update_global_defaults(&mut self, overrides: &Value) {
        Rc::make_mut(&mut self.defaults).update_global(overrides);
    }

    /// Register a chart type with its own controller
    pub fn register_controller(&mut self, name: impl Into<String>, controller: Rc<dyn DatasetController>, defaults: Value) {
        let name = name.into();
        Rc::make_mut(&mut self.defaults).register_type(name.clone(), defaults);
        debug!(chart_type = %name, "registered controller");
        self.controllers.insert(name, controller);
    }

    /// Register a chart type that draws like `base` with extra defaults
    pub fn register_chart_type(&mut self, name: impl Into<String>, base: &str, defaults: Value) -> ChartResult<()> {
        let name = name.into();
        let controller = self
            .controllers
            .get(base)
            .cloned()
            .ok_or_else(|| ChartError::InvalidChartType(base.to_string()))?;
        Rc::make_mut(&mut self.defaults).extend_type(name.clone(), base, defaults)?;
        debug!(chart_type = %name, base, "registered chart type");
        self.controllers.insert(name, controller);
        Ok(())
    }

    pub fn has_chart_type(&self, name: &str) -> bool {
        self.controllers.contains_key(name) && self.defaults.has_type(name)
    }

    pub fn chart_types(&self) -> impl Iterator<Item = &str> {
        self.controllers.keys().map(String::as_str)
    }

    /// Create a chart drawing onto `canvas` and run its first update
    pub fn create_chart<C: Canvas + 'static>(&mut self, config: ChartConfig, canvas: C) -> ChartResult<ChartHandle<C>> {
        let controller = self
            .controllers
            .get(&config.chart_type)
            .cloned()
            .ok_or_else(|| ChartError::InvalidChartType(config.chart_type.clone()))?;
        let resolver: Rc<dyn OptionsResolver> = self.defaults.clone();
        let chart_type = config.chart_type.clone();
        let chart = Chart::new(config, canvas, resolver, controller, self.mixer.clone())?;
        let handle = ChartHandle::new(chart, self.scheduler.clone());
        debug!(chart = %handle.id(), %chart_type, "created chart");

        if let Err(err) = handle.update(UpdateMode::Default) {
            handle.destroy();
            return Err(err);
        }
        self.charts.insert(handle.id(), Box::new(handle.clone()));
        Ok(handle)
    }

    /// Stop and release a chart; false if it is not registered
    pub fn destroy_chart(&mut self, id: ChartId) -> bool {
        match self.charts.remove(&id) {
            Some(chart) => {
                chart.destroy();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: ChartId) -> bool {
        self.charts.contains_key(&id)
    }

    pub fn chart_count(&self) -> usize {
        self.charts.len()
    }

    /// Run one display frame for every animating chart
    pub fn tick(&self) -> TickReport {
        self.scheduler.tick()
    }

    /// Destroy every chart and drop all pending frames
    pub fn teardown(&mut self) {
        for (_, chart) in std::mem::take(&mut self.charts) {
            chart.destroy();
        }
        self.scheduler.clear();
    }
}

impl Drop for ChartRegistry {
    fn drop(&mut self) {
        self.teardown();
    }
}
