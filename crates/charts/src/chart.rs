//! Chart instances
//!
//! A [`Chart`] owns its canvas, scales and per-dataset element view states.
//! Updates run the layout pass, ask the controller for targets and hand them
//! to the animations coordinator; rendering advances the view states frame
//! by frame through the registry's scheduler. Callers hold a
//! [`ChartHandle`].

use std::cell::RefCell;
use std::rc::Rc;

use animation::{
    AnimationError, AnimationScheduler, AnimationsCoordinator, ColorMixer, Easing, FrameAnimation, OptionsSnapshot,
    PropertyMap, TargetId, TargetUpdate, UpdateMode, ViewState,
};
use canvas::Canvas;
use chart_config::{animation_settings, ChartOptions, OptionsResolver};
use elements::{Drawable, Element, Line, Point, TooltipPosition};
use scales::{ScaleBounds, ScaleGeometry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::axes::ScaleSet;
use crate::controllers::{ControllerContext, DatasetController, DatasetTargets, ElementTarget};
use crate::error::{ChartError, ChartResult};
use crate::layout::layout_boxes;
use crate::model::{ChartConfig, ChartData, ChartId};

/// One element of one dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementRef {
    pub dataset_index: usize,
    pub index: usize,
}

impl ElementRef {
    pub fn new(dataset_index: usize, index: usize) -> Self {
        Self { dataset_index, index }
    }
}

/// View states of one dataset
#[derive(Debug, Clone, Default)]
struct DatasetMeta {
    elements: Vec<ViewState>,
    /// Last snapshot handed to each element
    element_options: Vec<Rc<OptionsSnapshot>>,
    line: Option<ViewState>,
    line_options: Option<Rc<OptionsSnapshot>>,
    /// Snapshot all elements point at while their options agree
    shared: Option<Rc<OptionsSnapshot>>,
}

impl DatasetMeta {
    fn is_animating(&self) -> bool {
        self.elements.iter().chain(&self.line).any(ViewState::is_animating)
    }

    fn views_mut(&mut self) -> impl Iterator<Item = &mut ViewState> {
        self.elements.iter_mut().chain(self.line.as_mut())
    }
}

/// `existing` if it still holds `values`, else a new snapshot
fn reuse_snapshot(existing: Option<&Rc<OptionsSnapshot>>, values: &PropertyMap, shared: bool, fresh: bool) -> Rc<OptionsSnapshot> {
    match existing {
        Some(snapshot) if !fresh && snapshot.is_shared() == shared && snapshot.values() == values => snapshot.clone(),
        _ if shared => Rc::new(OptionsSnapshot::new_shared(values.clone())),
        _ => Rc::new(OptionsSnapshot::new_private(values.clone())),
    }
}

/// Apply `target` to `view`; `options` is passed on only when it differs
/// from the snapshot the view was last given
fn apply_target(
    coordinator: &AnimationsCoordinator,
    view: &mut ViewState,
    target: ElementTarget,
    options: &Rc<OptionsSnapshot>,
    previous: Option<&Rc<OptionsSnapshot>>,
    geometry: bool,
) -> bool {
    let mut update = TargetUpdate::new();
    if geometry {
        update = update.with_values(target.values);
    }
    if !previous.is_some_and(|previous| Rc::ptr_eq(previous, options)) {
        update = update.with_options(options.clone());
    }
    coordinator.update(view, update)
}

/// A chart drawing onto a canvas of type `C`
pub struct Chart<C> {
    id: ChartId,
    config: ChartConfig,
    resolved: Value,
    options: ChartOptions,
    resolver: Rc<dyn OptionsResolver>,
    controller: Rc<dyn DatasetController>,
    mixer: Rc<dyn ColorMixer>,
    animations: AnimationsCoordinator,
    scales: ScaleSet,
    chart_area: ScaleBounds,
    width: f64,
    height: f64,
    metas: Vec<DatasetMeta>,
    canvas: C,
    destroyed: bool,
}

impl<C> std::fmt::Debug for Chart<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("id", &self.id)
            .field("chart_type", &self.config.chart_type)
            .field("chart_area", &self.chart_area)
            .field("datasets", &self.metas.len())
            .finish_non_exhaustive()
    }
}

fn user_options(options: &Value) -> Value {
    if options.is_null() {
        Value::Object(Default::default())
    } else {
        options.clone()
    }
}

impl<C: Canvas> Chart<C> {
    /// Resolve `config`'s options and set up an empty chart; nothing is laid
    /// out until the first update
    pub fn new(
        config: ChartConfig,
        canvas: C,
        resolver: Rc<dyn OptionsResolver>,
        controller: Rc<dyn DatasetController>,
        mixer: Rc<dyn ColorMixer>,
    ) -> ChartResult<Self> {
        let resolved = resolver.resolve(&config.chart_type, &user_options(&config.options))?;
        let options = ChartOptions::from_resolved(&resolved)?;
        Ok(Self {
            id: ChartId::new(),
            width: canvas.width(),
            height: canvas.height(),
            config,
            resolved,
            options,
            resolver,
            controller,
            animations: AnimationsCoordinator::disabled().with_mixer(mixer.clone()),
            mixer,
            scales: ScaleSet::default(),
            chart_area: ScaleBounds::default(),
            metas: Vec::new(),
            canvas,
            destroyed: false,
        })
    }

    pub fn id(&self) -> ChartId {
        self.id
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn data(&self) -> &ChartData {
        &self.config.data
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// The merged options tree
    pub fn resolved_options(&self) -> &Value {
        &self.resolved
    }

    pub fn scales(&self) -> &ScaleSet {
        &self.scales
    }

    pub fn scale_geometry(&self, id: &str) -> Option<ScaleGeometry> {
        self.scales.geometry(id)
    }

    pub fn chart_area(&self) -> ScaleBounds {
        self.chart_area
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn view(&self, element: ElementRef) -> Option<&ViewState> {
        self.metas.get(element.dataset_index)?.elements.get(element.index)
    }

    pub fn line_view(&self, dataset_index: usize) -> Option<&ViewState> {
        self.metas.get(dataset_index)?.line.as_ref()
    }

    /// Snapshot the elements of a dataset share, if their options agree
    pub fn shared_options(&self, dataset_index: usize) -> Option<&Rc<OptionsSnapshot>> {
        self.metas.get(dataset_index)?.shared.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn set_data(&mut self, data: ChartData) {
        self.config.data = data;
    }

    /// Replace the user options and resolve them again
    pub fn set_options(&mut self, options: Value) -> ChartResult<()> {
        let resolved = self.resolver.resolve(&self.config.chart_type, &user_options(&options))?;
        self.options = ChartOptions::from_resolved(&resolved)?;
        self.resolved = resolved;
        self.config.options = options;
        Ok(())
    }

    /// Lay out and compute new targets. Returns true if any transition
    /// started.
    pub fn update(&mut self, mode: UpdateMode) -> ChartResult<bool> {
        self.refresh(mode, None)
    }

    fn refresh(&mut self, mode: UpdateMode, toggled: Option<usize>) -> ChartResult<bool> {
        self.animations = match animation_settings(&self.resolved, mode)? {
            Some(settings) => AnimationsCoordinator::from_settings(&settings),
            None => AnimationsCoordinator::disabled(),
        }
        .with_mixer(self.mixer.clone());

        self.scales = ScaleSet::build(&self.options, &self.config.data);
        self.chart_area = layout_boxes(self.scales.scales_mut(), self.width, self.height, &self.canvas);

        let ctx = ControllerContext {
            data: &self.config.data,
            options: &self.options,
            resolved: &self.resolved,
            scales: &self.scales,
            chart_area: self.chart_area,
        };
        let datasets = &self.config.data.datasets;
        let mut targets = Vec::with_capacity(datasets.len());
        for index in 0..datasets.len() {
            targets.push(self.controller.update(&ctx, index)?);
        }

        self.metas.truncate(datasets.len());
        self.metas.resize_with(datasets.len(), DatasetMeta::default);
        let mut started = false;
        for (index, (meta, targets)) in self.metas.iter_mut().zip(targets).enumerate() {
            let hidden = datasets[index].hidden;
            let fresh = toggled == Some(index);
            started |= Self::apply(&self.animations, meta, targets, hidden, fresh);
        }
        trace!(chart = %self.id, ?mode, started, "chart updated");
        Ok(started)
    }

    /// Hidden datasets only receive style changes; their geometry stays
    /// where it was while they fade out
    fn apply(coordinator: &AnimationsCoordinator, meta: &mut DatasetMeta, targets: DatasetTargets, hidden: bool, fresh: bool) -> bool {
        let uniform = targets.elements.windows(2).all(|pair| pair[0].options == pair[1].options);
        meta.shared = match (uniform, targets.elements.first()) {
            (true, Some(first)) => Some(reuse_snapshot(meta.shared.as_ref(), &first.options, true, fresh)),
            _ => None,
        };

        let count = targets.elements.len();
        meta.elements.truncate(count);
        meta.element_options.truncate(count);
        let mut started = false;
        for (i, target) in targets.elements.into_iter().enumerate() {
            let previous = meta.element_options.get(i).cloned();
            let snapshot = match &meta.shared {
                Some(shared) => shared.clone(),
                None => reuse_snapshot(previous.as_ref(), &target.options, false, fresh),
            };
            if i == meta.elements.len() {
                let initial = if hidden { target.values.clone() } else { target.initial_values() };
                meta.elements.push(ViewState::with_values(initial));
            }
            started |= apply_target(coordinator, &mut meta.elements[i], target, &snapshot, previous.as_ref(), !hidden);
            if i == meta.element_options.len() {
                meta.element_options.push(snapshot);
            } else {
                meta.element_options[i] = snapshot;
            }
        }

        match targets.line {
            Some(target) => {
                let snapshot = reuse_snapshot(meta.line_options.as_ref(), &target.options, false, fresh);
                let view = meta
                    .line
                    .get_or_insert_with(|| ViewState::with_values(target.initial_values()));
                started |= apply_target(coordinator, view, target, &snapshot, meta.line_options.as_ref(), !hidden);
                meta.line_options = Some(snapshot);
            }
            None => {
                meta.line = None;
                meta.line_options = None;
            }
        }
        started
    }

    /// Advance every element by `delta_ms`
    pub fn advance(&mut self, delta_ms: f64) {
        for meta in &mut self.metas {
            for view in meta.views_mut() {
                self.animations.advance(view, delta_ms);
            }
        }
    }

    /// Jump every transition to its end
    pub fn finish(&mut self) {
        self.advance(f64::INFINITY);
    }

    /// Longest remaining transition
    pub fn remaining_ms(&self) -> f64 {
        self.metas
            .iter()
            .flat_map(|meta| meta.elements.iter().chain(&meta.line))
            .map(ViewState::remaining_ms)
            .fold(0.0, f64::max)
    }

    pub fn is_animating(&self) -> bool {
        self.metas.iter().any(DatasetMeta::is_animating)
    }

    fn is_drawn(&self, dataset_index: usize) -> bool {
        let hidden = self
            .config
            .data
            .datasets
            .get(dataset_index)
            .map_or(true, |dataset| dataset.hidden);
        !hidden || self.metas.get(dataset_index).is_some_and(DatasetMeta::is_animating)
    }

    /// Clear the canvas and draw scales, lines and elements in their current
    /// state
    pub fn draw(&mut self) {
        self.canvas.clear();
        for scale in self.scales.iter() {
            scale.scale().draw(&mut self.canvas, &self.chart_area);
        }
        let kind = self.controller.element_kind();
        for (index, meta) in self.metas.iter().enumerate() {
            if !self.is_drawn(index) {
                continue;
            }
            if let Some(view) = meta.line.as_ref().filter(|_| self.controller.draws_line()) {
                let points = meta.elements.iter().map(Point::from_view).collect();
                let mut line = Line::from_view(view, points);
                if self.controller.closes_line() {
                    line = line.closed();
                }
                line.draw(&mut self.canvas);
            }
            for view in &meta.elements {
                Element::from_view(kind, view).draw(&mut self.canvas);
            }
        }
    }

    fn visible_elements(&self) -> impl Iterator<Item = (ElementRef, Element)> + '_ {
        let kind = self.controller.element_kind();
        self.metas
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.config.data.datasets.get(*index).map_or(true, |d| d.hidden))
            .flat_map(move |(dataset_index, meta)| {
                meta.elements
                    .iter()
                    .enumerate()
                    .map(move |(index, view)| (ElementRef::new(dataset_index, index), Element::from_view(kind, view)))
            })
    }

    /// First visible element containing the point
    pub fn element_at(&self, x: f64, y: f64) -> Option<ElementRef> {
        self.visible_elements()
            .find(|(_, element)| element.in_range(x, y))
            .map(|(element_ref, _)| element_ref)
    }

    /// Every visible element sharing the index of the first element whose
    /// group range holds `x`. Shapes without a group range are matched on
    /// the point itself.
    pub fn elements_at(&self, x: f64, y: f64) -> Vec<ElementRef> {
        let hit = self
            .visible_elements()
            .find(|(_, element)| element.in_group_range(x))
            .map(|(element_ref, _)| element_ref)
            .or_else(|| self.element_at(x, y));
        match hit {
            Some(hit) => self
                .visible_elements()
                .filter(|(element_ref, _)| element_ref.index == hit.index)
                .map(|(element_ref, _)| element_ref)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn tooltip_position(&self, element: ElementRef) -> Option<TooltipPosition> {
        let view = self.view(element)?;
        Some(Element::from_view(self.controller.element_kind(), view).tooltip_position())
    }

    /// Stop all transitions and clear the canvas
    fn destroy(&mut self) {
        for meta in &mut self.metas {
            meta.views_mut().for_each(ViewState::cancel_all);
        }
        self.metas.clear();
        self.canvas.clear();
        self.destroyed = true;
        debug!(chart = %self.id, "chart destroyed");
    }
}

/// Shared handle to a chart registered with a [`crate::ChartRegistry`]
pub struct ChartHandle<C> {
    id: ChartId,
    chart: Rc<RefCell<Chart<C>>>,
    scheduler: AnimationScheduler,
}

impl<C> Clone for ChartHandle<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            chart: self.chart.clone(),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<C> std::fmt::Debug for ChartHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartHandle").field("id", &self.id).finish_non_exhaustive()
    }
}

impl<C: Canvas + 'static> ChartHandle<C> {
    pub(crate) fn new(chart: Chart<C>, scheduler: AnimationScheduler) -> Self {
        Self {
            id: chart.id(),
            chart: Rc::new(RefCell::new(chart)),
            scheduler,
        }
    }

    pub fn id(&self) -> ChartId {
        self.id
    }

    /// Scheduler entry of this chart
    pub fn target(&self) -> TargetId {
        TargetId::from_uuid(self.id.as_uuid())
    }

    fn with_chart<R>(&self, f: impl FnOnce(&mut Chart<C>) -> ChartResult<R>) -> ChartResult<R> {
        let mut chart = self.chart.borrow_mut();
        if chart.destroyed {
            return Err(ChartError::ChartNotFound(self.id));
        }
        f(&mut chart)
    }

    /// Read the chart
    pub fn inspect<R>(&self, f: impl FnOnce(&Chart<C>) -> R) -> R {
        f(&self.chart.borrow())
    }

    /// Lay out, retarget every element and render the transition
    pub fn update(&self, mode: UpdateMode) -> ChartResult<bool> {
        let (started, remaining) = self.with_chart(|chart| {
            let started = chart.update(mode)?;
            Ok((started, chart.remaining_ms()))
        })?;
        self.render(remaining)?;
        Ok(started)
    }

    /// Animate towards the current targets over `duration_ms`, drawing each
    /// frame. A non-positive duration jumps to the end and draws once.
    pub fn render(&self, duration_ms: f64) -> ChartResult<()> {
        if duration_ms <= 0.0 || !duration_ms.is_finite() {
            self.scheduler.cancel_animation(self.target());
            return self.with_chart(|chart| {
                chart.finish();
                chart.draw();
                Ok(())
            });
        }

        let chart = Rc::downgrade(&self.chart);
        let mut last_progress = 0.0;
        let animation = FrameAnimation::new(duration_ms, Easing::Linear, move |frame| {
            let Some(chart) = chart.upgrade() else {
                return Ok(());
            };
            let mut chart = chart
                .try_borrow_mut()
                .map_err(|_| AnimationError::Render("chart is busy".to_string()))?;
            if frame.is_complete() {
                chart.finish();
            } else {
                chart.advance((frame.progress - last_progress) * duration_ms);
            }
            last_progress = frame.progress;
            chart.draw();
            Ok(())
        });
        self.scheduler.add_animation(self.target(), animation);
        Ok(())
    }

    /// Draw the current state without advancing
    pub fn draw(&self) -> ChartResult<()> {
        self.with_chart(|chart| {
            chart.draw();
            Ok(())
        })
    }

    /// Stop the running render; elements keep their current values
    pub fn stop(&self) -> bool {
        self.scheduler.cancel_animation(self.target())
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.is_animating(self.target())
    }

    /// New canvas size; updates in resize mode
    pub fn resize(&self, width: f64, height: f64) -> ChartResult<bool> {
        self.with_chart(|chart| {
            chart.width = width.max(0.0);
            chart.height = height.max(0.0);
            Ok(())
        })?;
        self.update(UpdateMode::Resize)
    }

    /// Show or hide a dataset, animating in show or hide mode
    pub fn set_dataset_visibility(&self, dataset_index: usize, visible: bool) -> ChartResult<bool> {
        let changed = self.with_chart(|chart| {
            let dataset = chart
                .config
                .data
                .datasets
                .get_mut(dataset_index)
                .ok_or_else(|| ChartError::InvalidData(format!("no dataset at index {dataset_index}")))?;
            let changed = dataset.hidden == visible;
            dataset.hidden = !visible;
            Ok(changed)
        })?;
        if !changed {
            return Ok(false);
        }
        let mode = if visible { UpdateMode::Show } else { UpdateMode::Hide };
        let (started, remaining) = self.with_chart(|chart| {
            let started = chart.refresh(mode, Some(dataset_index))?;
            Ok((started, chart.remaining_ms()))
        })?;
        self.render(remaining)?;
        Ok(started)
    }

    pub fn is_dataset_visible(&self, dataset_index: usize) -> bool {
        self.inspect(|chart| {
            chart
                .data()
                .datasets
                .get(dataset_index)
                .is_some_and(|dataset| !dataset.hidden)
        })
    }

    /// Replace the data; takes effect on the next update
    pub fn set_data(&self, data: ChartData) -> ChartResult<()> {
        self.with_chart(|chart| {
            chart.set_data(data);
            Ok(())
        })
    }

    /// Replace the user options; takes effect on the next update
    pub fn set_options(&self, options: Value) -> ChartResult<()> {
        self.with_chart(|chart| chart.set_options(options))
    }

    pub fn element_at(&self, x: f64, y: f64) -> Option<ElementRef> {
        self.inspect(|chart| chart.element_at(x, y))
    }

    pub fn elements_at(&self, x: f64, y: f64) -> Vec<ElementRef> {
        self.inspect(|chart| chart.elements_at(x, y))
    }

    pub fn tooltip_position(&self, element: ElementRef) -> Option<TooltipPosition> {
        self.inspect(|chart| chart.tooltip_position(element))
    }

    pub fn chart_area(&self) -> ScaleBounds {
        self.inspect(Chart::chart_area)
    }

    /// Stop rendering and release the chart's elements
    pub fn destroy(&self) {
        self.scheduler.cancel_animation(self.target());
        let mut chart = self.chart.borrow_mut();
        if !chart.destroyed {
            chart.destroy();
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.inspect(Chart::is_destroyed)
    }
}
