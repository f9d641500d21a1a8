use costforest_cli::CliResult;

fn main() -> CliResult<()> {
    costforest_cli::run()
}
