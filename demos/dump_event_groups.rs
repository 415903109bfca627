use log::info;
use perf_groups::metadata::{discover_uncore_devices, parse_perf_list};
use perf_groups::{load_event_groups, LoadConfig, Metadata};

fn main() -> perf_groups::Result<()> {
    env_logger::init();

    // Get path to the platform metadata snapshot
    let mut args = std::env::args().skip(1);
    let metadata_path = match args.next() {
        Some(a) => a,
        None => std::env::var("PERF_GROUPS_METADATA")?,
    };
    let mut metadata = Metadata::from_json_file(&metadata_path)?;

    // Optionally refresh the supported events from captured `perf list` output
    if let Some(perf_list) = args.next() {
        metadata.perf_supported_events = parse_perf_list(&std::fs::read_to_string(perf_list)?);
    }
    if metadata.uncore_device_ids.is_empty() {
        metadata.uncore_device_ids = discover_uncore_devices("/sys/devices")?;
    }

    // Compile groups
    let config = LoadConfig::from_env()?;
    let event_groups = load_event_groups(&config, &metadata)?;

    // Dump groups
    for (i, group) in event_groups.groups.iter().enumerate() {
        info!("group {} -> {:?}", i, group.names());
        for event in group.iter() {
            println!("{}\t{}", i, event.raw);
        }
    }
    info!("uncollectable -> {:#?}", event_groups.uncollectable);

    Ok(())
}
