use asn_cidr_filter::config::Config;
use asn_cidr_filter::logging::init_logging;
use asn_cidr_filter::output::print_summary;
use asn_cidr_filter::run;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    init_logging("log4rs.yml")?;
    dotenv::dotenv().ok();

    let start_time = chrono::Local::now();
    log::info!("#Start main() at {}", start_time.to_rfc3339());

    let config = Config::from_env()?;
    log::info!(
        "Fetching IPs from {} for {} ASNs: {}",
        config.input_file.display(),
        config.country_code,
        config.asns.join(", ")
    );

    let outcome = run(&config).map_err(|e| {
        log::error!("Aborting update: {e}");
        e
    })?;
    print_summary(&outcome);

    let end_time = chrono::Local::now();
    log::info!(
        "#End main() at {}, total execution time: {}ms",
        end_time.to_rfc3339(),
        (end_time - start_time).num_milliseconds()
    );
    Ok(())
}
