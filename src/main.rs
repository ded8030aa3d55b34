use anyhow::Result;
use clap::Parser;
use snake2d::app::App;
use snake2d::game::GameConfig;

#[derive(Parser)]
#[command(name = "snake2d")]
#[command(version, about = "Classic snake on a toroidal grid, with fluid motion")]
struct Cli {
    /// Grid width in tiles
    #[arg(long, default_value = "30")]
    width: usize,

    /// Grid height in tiles
    #[arg(long, default_value = "30")]
    height: usize,

    /// Tile edge length in canvas pixels
    #[arg(long, default_value = "4")]
    tile_size: u32,

    /// Speed scalar in [0, 1]; 1 is fastest
    #[arg(long, default_value = "1.0")]
    speed: f32,

    /// Snap segments to whole tiles instead of interpolating
    #[arg(long)]
    no_fluid: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = GameConfig::new(cli.width, cli.height);
    config.tile_size = cli.tile_size;
    config.speed = cli.speed;
    config.fluid = !cli.no_fluid;
    config.validate()?;

    let mut app = App::new(config);
    app.run().await
}
