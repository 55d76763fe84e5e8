//! Page controller: compiles a PageSpec into engine registrations and owns
//! everything that is not a one-shot: tab groups, nav highlighting, chart
//! build orchestration.
//!
//! The controller is the single code path through which values reach the
//! screen: role compilation routes every mutation through the reveal
//! engine's write contract, and the controller's own writes (tabs, nav)
//! are idempotent class/style assertions.

use std::f32::consts::PI;
use std::mem;

use anyhow::{Context, Result};
use hashbrown::HashMap;
use log::warn;

use onview_api_core::{ElementPath, TargetHandle, WriteBatch, WriteOp};
use onview_reveal_core::{
    Config, CoreEvent, Easing, Engine, FrameSink, Inputs, RegId, RunMode, RunSpec, ValueFormat,
};

use crate::chart::ChartSpec;
use crate::inputs::{PageInputs, UiCommand};
use crate::nav::{NavSection, NavState};
use crate::outputs::{PageEvent, PageOutputs};
use crate::spec::{NavSpec, PageSpec, RoleSpec, TabGroupSpec};
use crate::tabs::TabGroup;

/// Resolves canonical element paths to host handles. The default resolver
/// uses the path text itself; DOM hosts typically map paths to ids.
pub trait TargetResolver {
    fn resolve(&mut self, path: &ElementPath) -> Option<TargetHandle>;
}

/// Path text is the handle. Adequate whenever the host indexes elements by
/// the same names the page spec uses.
pub struct IdentityResolver;

impl TargetResolver for IdentityResolver {
    fn resolve(&mut self, path: &ElementPath) -> Option<TargetHandle> {
        Some(path.to_string())
    }
}

/// A role lowered to engine vocabulary: what to observe, what to run, what
/// to write before anything animates.
#[derive(Clone, Debug)]
enum CompiledRole {
    /// Counter, ring, bar chart, horizontal bars: fire-and-forget runs.
    Oneshot {
        observe: TargetHandle,
        threshold: f32,
        runs: Vec<RunSpec>,
        init: Vec<WriteOp>,
    },
    /// Class reveals with pending-sibling stagger, one registration per
    /// target so each fires on its own visibility.
    RevealBatch {
        threshold: f32,
        class: String,
        step_ms: u32,
        targets: Vec<TargetHandle>,
    },
    /// Lazily built chart: fire once, emit the table, never rebuild.
    Chart {
        observe: TargetHandle,
        threshold: f32,
        chart: ChartSpec,
    },
}

#[derive(Clone, Debug)]
struct HeroReveal {
    bar: TargetHandle,
    hero: TargetHandle,
    threshold: f32,
    class: String,
}

pub struct PageController {
    cfg: Config,
    engine: Engine,
    compiled: Vec<CompiledRole>,

    // Registration maps, rebuilt by register().
    chart_regs: HashMap<RegId, usize>,
    reveal_regs: HashMap<RegId, (usize, usize)>,
    /// Per-compiled-role fired flags for reveal batches (empty elsewhere).
    reveal_fired: Vec<Vec<bool>>,

    tabs: Vec<TabGroup>,
    /// Panel handle -> compiled one-shot roles re-played on tab switch.
    panel_runs: HashMap<TargetHandle, Vec<usize>>,

    nav: Option<NavState>,
    section_targets: HashMap<String, TargetHandle>,
    hero_reveal: Option<HeroReveal>,

    /// Writes staged at build/reset time, flushed with the next update.
    pending_init: WriteBatch,
    outputs: PageOutputs,
}

impl PageController {
    /// Compile a page spec with identity path resolution.
    pub fn build(spec: &PageSpec, cfg: Config) -> Result<Self> {
        Self::build_with(spec, cfg, &mut IdentityResolver)
    }

    /// Compile a page spec, resolving element paths through `resolver`.
    /// Roles whose paths do not resolve are skipped: the corresponding
    /// feature silently does nothing, matching how a page behaves when an
    /// element is absent from the document.
    pub fn build_with(
        spec: &PageSpec,
        cfg: Config,
        resolver: &mut dyn TargetResolver,
    ) -> Result<Self> {
        spec.validate_basic()
            .with_context(|| format!("invalid page spec '{}'", spec.name))?;

        let mut ctrl = Self {
            engine: Engine::new(cfg.clone()),
            cfg,
            compiled: Vec::new(),
            chart_regs: HashMap::new(),
            reveal_regs: HashMap::new(),
            reveal_fired: Vec::new(),
            tabs: Vec::new(),
            panel_runs: HashMap::new(),
            nav: None,
            section_targets: HashMap::new(),
            hero_reveal: None,
            pending_init: WriteBatch::new(),
            outputs: PageOutputs::default(),
        };

        for role in &spec.roles {
            match compile_role(role, &ctrl.cfg, resolver) {
                Some(c) => ctrl.compiled.push(c),
                None => warn!("page '{}': skipping role with unresolved target", spec.name),
            }
        }

        for section in &spec.sections {
            if let Some(handle) = resolver.resolve(&section.target) {
                ctrl.section_targets.insert(section.id.clone(), handle);
            }
        }
        if let Some(nav) = &spec.nav {
            ctrl.nav = compile_nav(spec, nav, resolver);
            ctrl.hero_reveal = nav.reveal.as_ref().and_then(|r| {
                Some(HeroReveal {
                    bar: resolver.resolve(&r.bar)?,
                    hero: resolver.resolve(&r.hero)?,
                    threshold: r.threshold,
                    class: r.class.clone(),
                })
            });
        }

        for group in &spec.tab_groups {
            if let Some(tab) = compile_tab_group(group, resolver, &mut ctrl.panel_runs, &ctrl.compiled)
            {
                ctrl.tabs.push(tab);
            }
        }

        ctrl.register();
        Ok(ctrl)
    }

    /// (Re)create engine registrations and stage the initial writes.
    fn register(&mut self) {
        self.chart_regs.clear();
        self.reveal_regs.clear();
        self.reveal_fired = vec![Vec::new(); self.compiled.len()];
        self.pending_init.clear();

        for (idx, role) in self.compiled.iter().enumerate() {
            match role {
                CompiledRole::Oneshot {
                    observe,
                    threshold,
                    runs,
                    init,
                } => {
                    self.pending_init.extend(init.iter().cloned());
                    self.engine.observe(observe, *threshold, runs.clone());
                }
                CompiledRole::RevealBatch {
                    threshold, targets, ..
                } => {
                    self.reveal_fired[idx] = vec![false; targets.len()];
                    for (ti, target) in targets.iter().enumerate() {
                        let reg = self.engine.observe(target, *threshold, Vec::new());
                        self.reveal_regs.insert(reg, (idx, ti));
                    }
                }
                CompiledRole::Chart {
                    observe, threshold, ..
                } => {
                    let reg = self.engine.observe(observe, *threshold, Vec::new());
                    self.chart_regs.insert(reg, idx);
                }
            }
        }

        for tab in &mut self.tabs {
            tab.active = tab.initial;
            tab.assert_writes(&mut self.pending_init);
        }
    }

    /// Begin a fresh page lifetime: every one-shot may play again. Within
    /// one lifetime nothing ever replays; hosts that re-enter the same view
    /// without a reload call this deliberately.
    pub fn reset(&mut self) {
        self.engine = Engine::new(self.cfg.clone());
        if let Some(nav) = &mut self.nav {
            nav.active = None;
        }
        self.register();
    }

    pub fn pending_registrations(&self) -> usize {
        self.engine.pending_registrations()
    }

    /// Replace cached section offsets after the host re-measured layout
    /// (resize, fonts settling, dynamic content).
    pub fn set_section_offsets(&mut self, offsets: &[(String, f32)]) {
        if let Some(nav) = &mut self.nav {
            nav.set_section_offsets(offsets);
        }
    }

    /// Step the page by dt milliseconds.
    pub fn update(&mut self, dt_ms: f64, inputs: PageInputs) -> &PageOutputs {
        self.outputs.clear();
        let staged = mem::take(&mut self.pending_init);
        self.outputs.writes.append(staged);

        // Click-driven commands first, so a tab switch in this tick can
        // spawn runs the engine steps next tick.
        for cmd in &inputs.commands {
            match cmd {
                UiCommand::SelectTab { group, panel } => self.select_tab(group, *panel),
                UiCommand::NavClick { section } => match self.section_targets.get(section) {
                    Some(target) => self.outputs.events.push(PageEvent::ScrollRequested {
                        target: target.clone(),
                    }),
                    None => warn!("nav click for unknown section '{section}'"),
                },
            }
        }

        // Continuous hero toggle: unlike every other visibility consumer
        // this reacts on both edges, so it reads the raw samples.
        if let Some(hr) = &self.hero_reveal {
            for s in &inputs.visibility {
                if s.target == hr.hero {
                    let op = if s.fraction < hr.threshold {
                        WriteOp::add_class(hr.bar.clone(), hr.class.clone())
                    } else {
                        WriteOp::remove_class(hr.bar.clone(), hr.class.clone())
                    };
                    self.outputs.writes.push(op);
                }
            }
        }

        // One engine tick.
        let core = self.engine.update(
            dt_ms,
            Inputs {
                visibility: inputs.visibility,
                cancels: Vec::new(),
            },
        );
        let core_writes = core.writes.clone();
        let core_events = core.events.clone();
        self.outputs.writes.append(core_writes);

        let mut reveal_hits: Vec<(usize, usize)> = Vec::new();
        for ev in core_events {
            if let CoreEvent::TriggerFired { reg, target } = &ev {
                if let Some(&idx) = self.chart_regs.get(reg) {
                    if let CompiledRole::Chart { chart, .. } = &self.compiled[idx] {
                        self.outputs.events.push(PageEvent::ChartBuildRequested {
                            target: target.clone(),
                            chart: chart.clone(),
                        });
                    }
                } else if let Some(&hit) = self.reveal_regs.get(reg) {
                    reveal_hits.push(hit);
                }
            }
            self.outputs.events.push(PageEvent::Reveal(ev));
        }
        self.schedule_reveals(reveal_hits);

        // Scroll polling last: progress + active-section recomputation.
        if let Some(sample) = inputs.scroll {
            if let Some(nav) = &mut self.nav {
                if let Some(section) = nav.on_scroll(sample, &mut self.outputs.writes) {
                    self.outputs
                        .events
                        .push(PageEvent::SectionActivated { section });
                }
            }
        }

        &self.outputs
    }

    /// Stagger newly fired reveal targets by their index among the batch's
    /// still-pending siblings. Positions are computed against the fired
    /// state at tick start: three cards firing together get 0, 1, 2 steps
    /// even though they are processed in one pass.
    fn schedule_reveals(&mut self, hits: Vec<(usize, usize)>) {
        let mut spawns: Vec<RunSpec> = Vec::new();
        for &(idx, ti) in &hits {
            if let CompiledRole::RevealBatch {
                class,
                step_ms,
                targets,
                ..
            } = &self.compiled[idx]
            {
                let fired = &self.reveal_fired[idx];
                let pos = (0..ti).filter(|&tj| !fired[tj]).count();
                spawns.push(RunSpec {
                    target: targets[ti].clone(),
                    from: 0.0,
                    to: 1.0,
                    duration_ms: 0,
                    delay_ms: pos as u32 * step_ms,
                    easing: Easing::Linear,
                    mode: RunMode::Delegated { settle_frames: 0 },
                    sink: FrameSink::Class {
                        class: class.clone(),
                    },
                    zero_state: false,
                });
            }
        }
        // Mark after computing every position: same-tick siblings all see
        // the pending list as it stood when they fired.
        for (idx, ti) in hits {
            if let Some(flags) = self.reveal_fired.get_mut(idx) {
                if let Some(f) = flags.get_mut(ti) {
                    *f = true;
                }
            }
        }
        for spec in spawns {
            self.engine.spawn(spec);
        }
    }

    fn select_tab(&mut self, group: &str, panel: usize) {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.group == group) else {
            warn!("unknown tab group '{group}'");
            return;
        };
        if !tab.select(panel, &mut self.outputs.writes) {
            warn!("tab group '{group}' has no panel {panel}");
            return;
        }
        // Re-play the one-shots the newly shown panel contains: hiding the
        // panel reset them to the zero state, so they re-run with an
        // explicit zero write first.
        let Some(active) = tab.active_panel().cloned() else {
            return;
        };
        if let Some(indices) = self.panel_runs.get(&active) {
            for &idx in indices {
                if let CompiledRole::Oneshot { runs, .. } = &self.compiled[idx] {
                    for spec in runs {
                        let mut spec = spec.clone();
                        spec.zero_state = true;
                        self.engine.spawn(spec);
                    }
                }
            }
        }
    }
}

/// Lower one role to engine vocabulary. None when a path fails to resolve.
fn compile_role(
    role: &RoleSpec,
    cfg: &Config,
    resolver: &mut dyn TargetResolver,
) -> Option<CompiledRole> {
    match role {
        RoleSpec::Counter {
            target,
            value,
            decimals,
            suffix,
            duration_ms,
            threshold,
        } => {
            let handle = resolver.resolve(target)?;
            Some(CompiledRole::Oneshot {
                observe: handle.clone(),
                threshold: *threshold,
                runs: vec![RunSpec {
                    target: handle,
                    from: 0.0,
                    to: *value,
                    duration_ms: *duration_ms,
                    delay_ms: 0,
                    easing: Easing::EaseOutCubic,
                    mode: RunMode::Driven,
                    sink: FrameSink::Text {
                        format: ValueFormat {
                            decimals: *decimals,
                            suffix: suffix.clone(),
                        },
                    },
                    zero_state: false,
                }],
                init: Vec::new(),
            })
        }
        RoleSpec::Ring {
            ring,
            readout,
            radius,
            percent,
            readout_duration_ms,
            threshold,
        } => {
            let ring_handle = resolver.resolve(ring)?;
            let circumference = 2.0 * PI * radius;
            let offset_fmt = ValueFormat {
                decimals: 1,
                suffix: String::new(),
            };
            // Start fully hidden: dash period equals the circumference and
            // the offset pushes the entire stroke out of view.
            let init = vec![
                WriteOp::set_style(
                    ring_handle.clone(),
                    "stroke-dasharray",
                    offset_fmt.render(circumference),
                ),
                WriteOp::set_style(
                    ring_handle.clone(),
                    "stroke-dashoffset",
                    offset_fmt.render(circumference),
                ),
            ];
            let mut runs = vec![RunSpec {
                target: ring_handle.clone(),
                from: circumference,
                to: circumference - (percent / 100.0) * circumference,
                duration_ms: *readout_duration_ms,
                delay_ms: 0,
                easing: Easing::EaseOutCubic,
                mode: RunMode::Delegated {
                    settle_frames: cfg.settle_frames,
                },
                sink: FrameSink::Style {
                    name: "stroke-dashoffset".into(),
                    format: offset_fmt,
                },
                zero_state: false,
            }];
            if let Some(readout) = readout {
                if let Some(readout_handle) = resolver.resolve(readout) {
                    runs.push(RunSpec {
                        target: readout_handle,
                        from: 0.0,
                        to: *percent,
                        duration_ms: *readout_duration_ms,
                        delay_ms: 0,
                        easing: Easing::EaseOutCubic,
                        mode: RunMode::Driven,
                        sink: FrameSink::Text {
                            format: ValueFormat::integer(),
                        },
                        zero_state: false,
                    });
                }
            }
            // Observe the ring element itself, never the enclosing section:
            // a section taller than the viewport cannot reach the fraction
            // and the trigger would sit unfired forever.
            Some(CompiledRole::Oneshot {
                observe: ring_handle,
                threshold: *threshold,
                runs,
                init,
            })
        }
        RoleSpec::BarChart {
            container,
            bars,
            stagger_ms,
            threshold,
        } => {
            let observe = resolver.resolve(container)?;
            let pct = ValueFormat::with_suffix("%");
            let mut init = Vec::new();
            let mut runs = Vec::new();
            for (i, bar) in bars.iter().enumerate() {
                let Some(handle) = resolver.resolve(&bar.target) else {
                    continue;
                };
                init.push(WriteOp::set_style(handle.clone(), "height", "0%"));
                runs.push(RunSpec {
                    target: handle,
                    from: 0.0,
                    to: bar.height_pct,
                    duration_ms: 0,
                    delay_ms: i as u32 * stagger_ms,
                    easing: Easing::Linear,
                    // The stagger delay itself gives the host time to commit
                    // the zero state, so no settle ticks are needed.
                    mode: RunMode::Delegated { settle_frames: 0 },
                    sink: FrameSink::Style {
                        name: "height".into(),
                        format: pct.clone(),
                    },
                    zero_state: false,
                });
            }
            Some(CompiledRole::Oneshot {
                observe,
                threshold: *threshold,
                runs,
                init,
            })
        }
        RoleSpec::HBarGroup {
            container,
            fills,
            threshold,
        } => {
            let observe = resolver.resolve(container)?;
            let pct = ValueFormat::with_suffix("%");
            let runs = fills
                .iter()
                .filter_map(|fill| {
                    let handle = resolver.resolve(&fill.target)?;
                    Some(RunSpec {
                        target: handle,
                        from: 0.0,
                        to: fill.width_pct,
                        duration_ms: 0,
                        delay_ms: 0,
                        easing: Easing::Linear,
                        mode: RunMode::Delegated {
                            settle_frames: cfg.settle_frames,
                        },
                        sink: FrameSink::Style {
                            name: "width".into(),
                            format: pct.clone(),
                        },
                        // Widths start unset in the document; write the zero
                        // state on activation so the transition has a start.
                        zero_state: true,
                    })
                })
                .collect();
            Some(CompiledRole::Oneshot {
                observe,
                threshold: *threshold,
                runs,
                init: Vec::new(),
            })
        }
        RoleSpec::Reveal {
            targets,
            class,
            stagger_ms,
            threshold,
        } => {
            let resolved: Vec<TargetHandle> = targets
                .iter()
                .filter_map(|t| resolver.resolve(t))
                .collect();
            if resolved.is_empty() {
                return None;
            }
            Some(CompiledRole::RevealBatch {
                threshold: *threshold,
                class: class.clone(),
                step_ms: *stagger_ms,
                targets: resolved,
            })
        }
        RoleSpec::Chart {
            container,
            chart,
            threshold,
        } => Some(CompiledRole::Chart {
            observe: resolver.resolve(container)?,
            threshold: *threshold,
            chart: chart.clone(),
        }),
    }
}

fn compile_nav(
    spec: &PageSpec,
    nav: &NavSpec,
    resolver: &mut dyn TargetResolver,
) -> Option<NavState> {
    let links: Vec<(String, TargetHandle)> = nav
        .links
        .iter()
        .filter_map(|l| Some((l.section.clone(), resolver.resolve(&l.target)?)))
        .collect();
    let sections = spec
        .sections
        .iter()
        .map(|s| NavSection {
            id: s.id.clone(),
            top_px: s.top_px,
        })
        .collect();
    Some(NavState {
        sections,
        links,
        active_class: nav.active_class.clone(),
        underline: nav.underline.as_ref().and_then(|p| resolver.resolve(p)),
        percent_readout: nav
            .percent_readout
            .as_ref()
            .and_then(|p| resolver.resolve(p)),
        offset_px: nav.offset_px,
        active: None,
    })
}

fn compile_tab_group(
    group: &TabGroupSpec,
    resolver: &mut dyn TargetResolver,
    panel_runs: &mut HashMap<TargetHandle, Vec<usize>>,
    compiled: &[CompiledRole],
) -> Option<TabGroup> {
    let buttons: Vec<TargetHandle> = group
        .buttons
        .iter()
        .filter_map(|p| resolver.resolve(p))
        .collect();
    let panels: Vec<TargetHandle> = group
        .panels
        .iter()
        .filter_map(|p| resolver.resolve(&p.target))
        .collect();
    if buttons.len() != panels.len() || panels.is_empty() {
        warn!("tab group '{}' has mismatched buttons/panels", group.group);
        return None;
    }

    for (panel_spec, panel_handle) in group.panels.iter().zip(panels.iter()) {
        let mut indices = Vec::new();
        for contained in &panel_spec.contains {
            let Some(handle) = resolver.resolve(contained) else {
                continue;
            };
            for (idx, role) in compiled.iter().enumerate() {
                if let CompiledRole::Oneshot { observe, .. } = role {
                    if *observe == handle {
                        indices.push(idx);
                    }
                }
            }
        }
        if !indices.is_empty() {
            panel_runs.insert(panel_handle.clone(), indices);
        }
    }

    let initial = group.initial.min(panels.len() - 1);
    Some(TabGroup {
        group: group.group.clone(),
        active_class: group.active_class.clone(),
        buttons,
        panels,
        active: initial,
        initial,
    })
}
