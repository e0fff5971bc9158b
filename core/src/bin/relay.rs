use relay_core::{
    cli, events::TracingObserver, relay::Relay, store::MemoryHeaderStore,
    utils::parse_header_lines,
};
use relay_errors::ResultExt;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let (config, args) = cli::get_configuration_from_cli();

    let seed = config.genesis_seed().map_to_eyre()?;
    let mut relay = Relay::new(config.consensus_params(), MemoryHeaderStore::new(), seed)
        .map_to_eyre()?
        .with_observer(TracingObserver);

    let contents = std::fs::read_to_string(&args.headers_file).map_to_eyre()?;

    let (mut accepted, mut rejected) = (0usize, 0usize);
    for (line, raw) in parse_header_lines(&contents).map_to_eyre()? {
        match relay.store_header(&raw) {
            Ok(_) => accepted += 1,
            Err(e) => {
                rejected += 1;
                tracing::warn!(line, "Skipping header: {e}");
            }
        }
    }
    tracing::info!(accepted, rejected, "Finished submitting headers");

    println!("{}", serde_json::to_string_pretty(relay.chain_state())?);

    Ok(())
}
