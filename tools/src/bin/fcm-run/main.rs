use anyhow::Context as _;
use anyhow::Result;
use std::env;
use std::io;
use std::io::Write as _;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Registry;
use tracing_tree::HierarchicalLayer;

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optflag("h", "help", "print this help menu");
    options.optopt(
        "c",
        "convergence",
        "convergence mode, see CONVERGENCE",
        "MODE",
    );
    options.optopt("k", "clusters", "number of clusters", "INTEGER");
    options.optopt("n", "iterations", "maximum iteration count", "INTEGER");
    options.optmulti(
        "p",
        "point",
        "add a point to the data set, see POINTS",
        "X,Y",
    );
    options.optopt(
        "s",
        "seed",
        "seed bytes for experiment reproduction (at most 32)",
        "BYTES",
    );
    options.optopt("t", "trace", "emit a chrome trace", "FILE");
    options.optflag("v", "verbose", "print membership totals and run outcome");

    let matches = options.parse(env::args().skip(1))?;

    if matches.opt_present("h") {
        eprintln!("{}", options.usage("Usage: fcm-run [options]"));
        eprint!(include_str!("help_after.txt"));
        return Ok(());
    }

    let registry = Registry::default().with(EnvFilter::from_env("LOG")).with(
        HierarchicalLayer::new(4)
            .with_targets(true)
            .with_bracketed_fields(true),
    );
    let _chrome_trace_guard = match matches.opt_str("t") {
        Some(filename) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(filename)
                .build();
            registry.with(chrome_layer).init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    };

    let points = {
        let specs = matches.opt_strs("p");
        if specs.is_empty() {
            fcm_tools::sample_points()
        } else {
            specs
                .iter()
                .map(|spec| {
                    fcm_tools::parse_point(spec)
                        .with_context(|| format!("invalid point {:?}", spec))
                })
                .collect::<Result<Vec<_>>>()?
        }
    };

    let cluster_count: usize = matches.opt_get("k")?.unwrap_or(2);
    if cluster_count == 0 {
        anyhow::bail!("-k, --clusters  must be greater than zero");
    }

    let rng = fcm_tools::rng_from_seed(&matches.opt_str("s").unwrap_or_default())?;
    let mut algorithm = fcm::FuzzyCMeans::new(rng, cluster_count);
    if let Some(max_iter) = matches.opt_get("n")? {
        algorithm.max_iter = max_iter;
    }
    if let Some(mode) = matches.opt_str("c") {
        algorithm.convergence = fcm_tools::parse_convergence(&mode)
            .with_context(|| format!("invalid convergence mode {:?}", mode))?;
    }

    let fit = algorithm
        .fit(&points)
        .context("failed to cluster the data set")?;

    let report = fcm_tools::format_report(&fit, matches.opt_present("v"));
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    stdout
        .write_all(report.as_bytes())
        .context("failed to print the clusters")?;

    Ok(())
}
