use anyhow::{bail, Context as _, Result};
use tracing::info;

use classicrypt::session::KeyMaterial;
use classicrypt::utils::format::{strip_fillers, Grouping};
use classicrypt::{Fillers, Grid, GridCodec, GridOrder, Mode};

use super::{read_text, Invocation};

pub(crate) struct GridArgs {
    pub key: String,
    pub order: Option<usize>,
    pub mode: Mode,
    pub filler: Option<char>,
    pub alternate: Option<char>,
    pub strip_fillers: bool,
    pub group: Option<Grouping>,
    pub show_grid: bool,
    pub text: Option<String>,
}

pub(crate) fn run_grid(ctx: &mut Invocation, args: GridArgs) -> Result<()> {
    let order = match args.order {
        Some(order) => GridOrder::try_from(order)?,
        None => ctx.settings.grid_order()?,
    };
    let defaults = ctx.settings.fillers();
    let fillers = Fillers::new(
        args.filler.unwrap_or(defaults.primary()),
        args.alternate.unwrap_or(defaults.alternate()),
    );
    let grouping = args.group.unwrap_or(ctx.settings.grouping);
    let text = read_text(args.text)?;

    let grid = Grid::build(&args.key, order);
    let codec = GridCodec::with_fillers(&grid, fillers)
        .with_context(|| format!("fillers {fillers:?} do not fit an order-{order} grid"))?;
    info!(%order, mode = %args.mode, chars = text.chars().count(), "running grid cipher");

    let output = match args.mode {
        Mode::Encode => codec.encode(&text),
        Mode::Decode => codec.decode(&text)?,
        Mode::Sign | Mode::Verify => bail!("the grid cipher only supports encode and decode"),
    };

    let body = if args.strip_fillers && args.mode == Mode::Decode {
        strip_fillers(&output.symbols, fillers)
    } else if grouping != Grouping::None {
        output.symbols.clone()
    } else {
        output.text.clone()
    };
    let result = grouping.apply(&body);

    if args.show_grid {
        println!("{grid}");
        println!();
    }
    if ctx.show_steps {
        println!("prepared: {}", output.prepared);
        println!("{}", output.trace.render());
        println!();
    }
    println!("{result}");

    let key = KeyMaterial::grid(&args.key, order);
    ctx.finish(args.mode, key, &text, &result)
}
