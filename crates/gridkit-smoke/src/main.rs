//! GridKit Smoke Harness
//!
//! This harness exercises the layout engine with a scripted form grid to
//! validate measurement and placement without any host toolkit: a handful
//! of stub items with fixed intrinsic sizes get registered from grammar
//! strings, measured, laid out at the requested size and logged.

use gridkit_constraints::{parse_axis, parse_placement};
use gridkit_layout::{
    Axis, Bounds, GridLayout, ItemId, ItemSize, LayoutItem, SizeBound, SizeClass,
};
use tracing::{error, info};

/// Parse command line arguments
struct Args {
    width: u32,
    height: u32,
    x_blocks: String,
    y_blocks: String,
    gap: u32,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut width = 480u32;
        let mut height = 240u32;
        let mut x_blocks = "[80,160][120,grow]".to_string();
        let mut y_blocks = ":[24,grow]".to_string();
        let mut gap = 6u32;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--width" => {
                    if let Some(val) = args.next() {
                        width = val.parse().unwrap_or(480);
                    }
                }
                "--height" => {
                    if let Some(val) = args.next() {
                        height = val.parse().unwrap_or(240);
                    }
                }
                "--x-blocks" => {
                    if let Some(val) = args.next() {
                        x_blocks = val;
                    }
                }
                "--y-blocks" => {
                    if let Some(val) = args.next() {
                        y_blocks = val;
                    }
                }
                "--gap" => {
                    if let Some(val) = args.next() {
                        gap = val.parse().unwrap_or(6);
                    }
                }
                _ => {}
            }
        }

        Self {
            width,
            height,
            x_blocks,
            y_blocks,
            gap,
        }
    }
}

/// Stub host item with fixed intrinsic sizes.
struct StubItem {
    name: &'static str,
    min: (u32, u32),
    pref: (u32, u32),
    max: Option<(u32, u32)>,
}

impl StubItem {
    fn new(
        name: &'static str,
        min: (u32, u32),
        pref: (u32, u32),
        max: Option<(u32, u32)>,
    ) -> Self {
        Self {
            name,
            min,
            pref,
            max,
        }
    }
}

impl LayoutItem for StubItem {
    fn intrinsic_width(&self, class: SizeClass) -> SizeBound {
        self.intrinsic_size(class).width
    }

    fn intrinsic_height(&self, class: SizeClass) -> SizeBound {
        self.intrinsic_size(class).height
    }

    fn intrinsic_size(&self, class: SizeClass) -> ItemSize {
        match class {
            SizeClass::Minimum => ItemSize::px(self.min.0, self.min.1),
            SizeClass::Preferred => ItemSize::px(self.pref.0, self.pref.1),
            SizeClass::Maximum => match self.max {
                Some((w, h)) => ItemSize::px(w, h),
                None => ItemSize::new(SizeBound::Unbounded, SizeBound::Unbounded),
            },
        }
    }

    fn apply_bounds(&mut self, bounds: Bounds) {
        info!(
            name = self.name,
            x = bounds.x,
            y = bounds.y,
            width = bounds.width,
            height = bounds.height,
            "placed"
        );
    }
}

/// The scripted scenario: a label/field form with a wide confirm button.
fn build_engine(args: &Args) -> Result<GridLayout<StubItem>, Box<dyn std::error::Error>> {
    let mut engine = GridLayout::with_gaps(args.gap, args.gap);

    let (explicit, repeating) = parse_axis(&args.x_blocks)?;
    engine.set_axis_blocks(Axis::X, explicit, repeating);
    let (explicit, repeating) = parse_axis(&args.y_blocks)?;
    engine.set_axis_blocks(Axis::Y, explicit, repeating);

    engine.register_item(
        ItemId(1),
        StubItem::new("label", (60, 16), (90, 20), Some((90, 20))),
        parse_placement("0 0, right, mid, fill-width=pref")?,
    )?;
    engine.register_item(
        ItemId(2),
        StubItem::new("field", (80, 16), (160, 22), None),
        parse_placement("1 0")?,
    )?;
    engine.register_item(
        ItemId(3),
        StubItem::new("note", (120, 14), (200, 14), Some((400, 16))),
        parse_placement("0 1 2 1, fill-width=pref")?,
    )?;
    engine.register_item(
        ItemId(4),
        StubItem::new("ok-button", (70, 24), (90, 26), Some((360, 30))),
        parse_placement("0 2 2 1, mid, bottom, fill-width=pref*1.2")?,
    )?;
    Ok(engine)
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = build_engine(args)?;

    for class in [SizeClass::Minimum, SizeClass::Preferred, SizeClass::Maximum] {
        let (width, height) = engine.measure(class)?;
        info!(?class, width, height, "measured");
    }

    info!(width = args.width, height = args.height, "running layout pass");
    engine.layout(args.width, args.height)?;
    Ok(())
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!(
        width = args.width,
        height = args.height,
        x_blocks = %args.x_blocks,
        y_blocks = %args.y_blocks,
        gap = args.gap,
        "GridKit smoke harness starting"
    );

    if let Err(e) = run(&args) {
        error!(error = %e, "smoke run failed");
        std::process::exit(1);
    }
    info!("smoke run complete");
}
