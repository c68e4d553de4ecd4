use async_trait::async_trait;
use mle_runtime::RuntimeContext;
use mle_runtime::event::id::{PAINT, RESIZE_SET_PRIORITY, RESIZE_STAGE_PRIORITY, SIZE};
use mle_runtime::event::{
    DispatchMode, Event, EventListener, PropChangeEvent, PropChangeListener,
};
use mle_runtime::scheduler::{CompletionSignal, ExitHandle, Phase, Runnable, SchedulerConfig, Task};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 每帧移动的演员，位置变化以属性变更事件广播
struct Mover {
    ctx: Weak<RuntimeContext>,
    x: AtomicI64,
}

#[async_trait]
impl Runnable for Mover {
    async fn run(&self, done: Option<CompletionSignal>) {
        if let Some(ctx) = self.ctx.upgrade() {
            let old = self.x.fetch_add(3, Ordering::SeqCst);
            if let Ok(change) = PropChangeEvent::new("mover", "x", json!(old), json!(old + 3)) {
                ctx.props().fire(&change);
            }
        }
        if let Some(done) = done {
            done.signal();
        }
    }
}

/// 处理本帧积累的延迟事件
struct Pump {
    ctx: Weak<RuntimeContext>,
}

#[async_trait]
impl Runnable for Pump {
    async fn run(&self, done: Option<CompletionSignal>) {
        if let Some(ctx) = self.ctx.upgrade() {
            let n = ctx.dispatcher().dispatch_events();
            debug!(events = n, "delayed events pumped");
        }
        if let Some(done) = done {
            done.signal();
        }
    }
}

/// 立即派发重绘，达到帧数后请求退出
struct Painter {
    ctx: Weak<RuntimeContext>,
    frames: usize,
    painted: AtomicUsize,
    exit: ExitHandle,
}

#[async_trait]
impl Runnable for Painter {
    async fn run(&self, done: Option<CompletionSignal>) {
        if let Some(ctx) = self.ctx.upgrade() {
            let frame = self.painted.fetch_add(1, Ordering::SeqCst) + 1;
            ctx.dispatcher()
                .process_event(PAINT, Some(json!({ "frame": frame })), DispatchMode::Immediate);
            if frame >= self.frames {
                ctx.set_exit_status(true);
                self.exit.set_exit_ok();
            }
        }
        if let Some(done) = done {
            done.signal();
        }
    }
}

/// 把属性变更转为延迟事件
struct PropBridge {
    ctx: Weak<RuntimeContext>,
    event: i32,
}

impl PropChangeListener for PropBridge {
    fn prop_changed(&self, change: &PropChangeEvent) {
        if let Some(ctx) = self.ctx.upgrade() {
            let data = json!({ "property": change.property_name(), "value": change.new_value() });
            ctx.dispatcher().process_event(self.event, Some(data), DispatchMode::Delayed);
        }
    }
}

struct Trace;

impl EventListener for Trace {
    fn event_processed(&self, event: &Event) {
        debug!(%event, "processed");
    }

    fn event_dispatched(&self, event: &Event) {
        debug!(%event, "dispatched");
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn install_callbacks(ctx: &RuntimeContext, moved: i32) -> anyhow::Result<()> {
    let dispatcher = ctx.dispatcher();

    dispatcher.install_event_cb(
        PAINT,
        Arc::new(|event: &Event, _: Option<&Value>| {
            info!(data = ?event.call_data(), "paint stage");
            true
        }),
        None,
    )?;
    dispatcher.install_event_cb_with_priority(
        SIZE,
        Arc::new(|event: &Event, data: Option<&Value>| {
            info!(size = ?event.call_data(), target = ?data, "resize");
            true
        }),
        Some(json!("stage")),
        RESIZE_STAGE_PRIORITY,
    )?;
    dispatcher.install_event_cb_with_priority(
        SIZE,
        Arc::new(|event: &Event, data: Option<&Value>| {
            info!(size = ?event.call_data(), target = ?data, "resize");
            true
        }),
        Some(json!("set")),
        RESIZE_SET_PRIORITY,
    )?;
    dispatcher.install_event_cb(
        moved,
        Arc::new(|event: &Event, _: Option<&Value>| {
            info!(change = ?event.call_data(), "actor moved");
            true
        }),
        None,
    )?;
    Ok(())
}

fn register_factories(ctx: &Arc<RuntimeContext>, frames: usize) -> anyhow::Result<()> {
    let factories = ctx.factories();

    let weak = Arc::downgrade(ctx);
    factories.register("mover", move || -> Arc<dyn Runnable> {
        Arc::new(Mover {
            ctx: weak.clone(),
            x: AtomicI64::new(0),
        })
    })?;

    let weak = Arc::downgrade(ctx);
    factories.register("pump", move || -> Arc<dyn Runnable> {
        Arc::new(Pump { ctx: weak.clone() })
    })?;

    let weak = Arc::downgrade(ctx);
    let exit = ctx.scheduler().exit_handle();
    factories.register("painter", move || -> Arc<dyn Runnable> {
        Arc::new(Painter {
            ctx: weak.clone(),
            frames,
            painted: AtomicUsize::new(0),
            exit: exit.clone(),
        })
    })?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let frames = env_or("MLE_DEMO_FRAMES", 5usize);
    let interval = Duration::from_millis(env_or("MLE_DEMO_INTERVAL_MS", 16u64));

    let ctx = Arc::new(
        RuntimeContext::builder()
            .scheduler_config(SchedulerConfig {
                sweep_interval: interval,
            })
            .build(),
    );

    let moved = ctx.register_event(1, Some("actor-moved"))?;
    install_callbacks(&ctx, moved)?;
    ctx.dispatcher().add_listener(Arc::new(Trace));
    ctx.props().add_listener(Arc::new(PropBridge {
        ctx: Arc::downgrade(&ctx),
        event: moved,
    }));
    register_factories(&ctx, frames)?;

    // 标题启动时先派发一次尺寸事件
    ctx.dispatcher().process_event(
        SIZE,
        Some(json!({ "width": 640, "height": 480 })),
        DispatchMode::Immediate,
    );

    let scheduler = ctx.scheduler().clone();
    for (phase_name, task_name) in [("behave", "mover"), ("events", "pump"), ("render", "painter")] {
        let phase = Arc::new(Phase::new(phase_name));
        scheduler.add_phase(phase.clone());
        let runnable: Arc<dyn Runnable> = ctx.factories().create(task_name)?;
        scheduler.add_task(&phase, Arc::new(Task::with_name(runnable, task_name)));
    }

    let topology = serde_json::to_string(&scheduler.dump())?;
    info!(%topology, "scheduler ready");

    let sweeps = scheduler.clone().start().join().await?;
    info!(sweeps, ok_to_exit = ctx.ok_to_exit(), "title finished");
    print!("{}", scheduler.dump());
    Ok(())
}
