use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cadence_common::FrameTime;
use cadence_core::{
    DeviceOp, GraphicsDevice, HeadlessWindow, RecordingDevice, RenderInstance, SolidLoadingScreen,
    Splash, WorldManager,
};
use cadence_driver::{BootstrapError, DriverConfig, FrameDriver, GameDefinition};
use cadence_sched::{CoroutineScheduler, FnTask, TaskState};
use cadence_world::{DirectWorldManager, DriftWorld, StagedWorldManager};

#[derive(Parser)]
#[command(name = "cadence-cli", about = "Headless host for cadence driver runs")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Drive a recording device for a fixed number of ticks
    Run {
        /// Number of ready ticks to run
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        /// Synthetic frame delta in milliseconds
        #[arg(short, long, default_value = "16")]
        delta_ms: u64,
        /// Entities in the drift world
        #[arg(short, long, default_value = "24")]
        entities: usize,
        /// Frames swallowed after each FPS sample
        #[arg(long, default_value = "0")]
        skip_frames: u32,
        /// Use the direct manager instead of the staged pipeline
        #[arg(long)]
        direct: bool,
    },
}

/// Headless benchmark game with one drift world.
struct BenchGame {
    direct: bool,
    entities: usize,
}

impl GameDefinition for BenchGame {
    fn name(&self) -> &str {
        "cadence-bench"
    }

    fn build_world_manager(&mut self) -> Result<Box<dyn WorldManager>, BootstrapError> {
        let world = DriftWorld::with_seed("main", 42, self.entities);
        if self.direct {
            let mut manager = DirectWorldManager::new();
            manager.register(Box::new(world));
            Ok(Box::new(manager))
        } else {
            let mut manager = StagedWorldManager::new();
            manager.register(Box::new(world));
            Ok(Box::new(manager))
        }
    }

    fn initial_world(&self) -> &str {
        "main"
    }
}

/// Recording device handle kept on both sides of the driver so the run can
/// be summarized afterwards.
#[derive(Clone)]
struct SharedRecorder(Rc<RefCell<RecordingDevice>>);

impl SharedRecorder {
    fn new() -> Self {
        Self(Rc::new(RefCell::new(RecordingDevice::new())))
    }

    fn take_ops(&self) -> Vec<DeviceOp> {
        self.0.borrow_mut().take_ops()
    }
}

impl GraphicsDevice for SharedRecorder {
    fn clear(&mut self, color: [f32; 4]) {
        self.0.borrow_mut().clear(color);
    }

    fn draw_instances(&mut self, instances: &[RenderInstance]) {
        self.0.borrow_mut().draw_instances(instances);
    }

    fn present(&mut self) {
        self.0.borrow_mut().present();
    }
}

fn run(ticks: u64, delta_ms: u64, entities: usize, skip_frames: u32, direct: bool) -> Result<()> {
    println!(
        "Run: ticks={ticks}, delta={delta_ms}ms, entities={entities}, manager={}",
        if direct { "direct" } else { "staged" }
    );

    let mut scheduler = CoroutineScheduler::new();
    let mut remaining = 5u32;
    scheduler.spawn(Box::new(FnTask::new("cache-warmup", move |_game, _ctx| {
        remaining -= 1;
        if remaining == 0 {
            TaskState::Complete
        } else {
            TaskState::Pending
        }
    })));

    let device = SharedRecorder::new();
    let config = DriverConfig {
        skip_frames,
        ..DriverConfig::default()
    };
    let mut driver = FrameDriver::new(config, Box::new(BenchGame { direct, entities }))
        .with_scheduler(Box::new(scheduler));
    driver.assign_host(
        Box::new(HeadlessWindow::new(640, 480)),
        Box::new(device.clone()),
        Box::new(SolidLoadingScreen),
        Splash::default(),
    );
    driver.begin_load()?;

    let mut total_ms = 0u64;
    let mut splash_frames = 0u32;
    while !driver.is_ready() {
        if splash_frames > 2000 {
            bail!("bootstrap never completed");
        }
        total_ms += delta_ms;
        let frame = FrameTime::from_millis(delta_ms, total_ms);
        driver.draw(frame)?;
        driver.update(frame)?;
        splash_frames += 1;
        thread::sleep(Duration::from_millis(1));
    }
    println!("Ready after {splash_frames} splash frames");
    device.take_ops();

    for _ in 0..ticks {
        total_ms += delta_ms;
        let frame = FrameTime::from_millis(delta_ms, total_ms);
        driver.update(frame)?;
        driver.draw(frame)?;
    }

    let ops = device.take_ops();
    let clears = ops.iter().filter(|op| matches!(op, DeviceOp::Clear(_))).count();
    let presents = ops.iter().filter(|op| matches!(op, DeviceOp::Present)).count();
    let instances: usize = ops
        .iter()
        .map(|op| match op {
            DeviceOp::Instances(count) => *count,
            _ => 0,
        })
        .sum();

    println!(
        "Driver: frames={}, fps={}, pending_tasks={}",
        driver.frame_count(),
        driver.fps(),
        driver.pending_tasks()
    );
    println!("Device: clears={clears}, instances={instances}, presents={presents}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("cadence-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", cadence_common::crate_info());
            println!("core: {}", cadence_core::crate_info());
            println!("render: {}", cadence_render::crate_info());
            println!("sched: {}", cadence_sched::crate_info());
            println!("world: {}", cadence_world::crate_info());
            println!("driver: {}", cadence_driver::crate_info());
        }
        Commands::Run {
            ticks,
            delta_ms,
            entities,
            skip_frames,
            direct,
        } => run(ticks, delta_ms, entities, skip_frames, direct)?,
    }

    Ok(())
}
