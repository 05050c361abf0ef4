use anyhow::Context as _;
use anyhow::Result;
use fcm::Convergence;
use fcm::Fit;
use fcm::Point2D;
use itertools::Itertools as _;
use rand::SeedableRng as _;

/// The data set clustered when no point is given on the command line.
pub fn sample_points() -> Vec<Point2D> {
    vec![
        Point2D::new(1.0, 2.0),
        Point2D::new(2.0, 1.5),
        Point2D::new(3.0, 1.0),
        Point2D::new(5.0, 4.0),
        Point2D::new(6.0, 5.0),
    ]
}

/// Parse a point written as `X,Y`.
pub fn parse_point(s: &str) -> Result<Point2D> {
    let (x, y) = s
        .split(',')
        .map(str::trim)
        .collect_tuple()
        .context("expected two comma-separated coordinates")?;

    fn coordinate(arg: &str) -> Result<f64> {
        let f = arg
            .parse::<f64>()
            .with_context(|| format!("arg {:?} is not a valid float", arg))?;
        if !f.is_finite() {
            anyhow::bail!("arg {:?} is not finite", arg);
        }
        Ok(f)
    }

    Ok(Point2D::new(coordinate(x)?, coordinate(y)?))
}

pub fn parse_convergence(s: &str) -> Result<Convergence> {
    Ok(match s {
        "deferred" => Convergence::Deferred,
        "committed" => Convergence::Committed,
        _ => anyhow::bail!("unknown convergence mode {:?}", s),
    })
}

/// Build a generator from up to 32 seed bytes, zero-padded.
pub fn rng_from_seed(seed: &str) -> Result<rand_pcg::Pcg64> {
    let mut bytes = seed.as_bytes().to_vec();
    if bytes.len() > 32 {
        anyhow::bail!("seed must be at most 32 bytes long, got {}", bytes.len());
    }
    bytes.resize(32, 0);
    let seed: [u8; 32] = bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("seed must be 32 bytes long"))?;
    Ok(rand_pcg::Pcg64::from_seed(seed))
}

/// One line per cluster: `Cluster <n> center: (<x>, <y>)`.
///
/// When `verbose` is set, lines also carry the membership total, and a
/// summary of the run is appended.
pub fn format_report(fit: &Fit, verbose: bool) -> String {
    let mut report = String::new();
    for (i, cluster) in fit.clusters.iter().enumerate() {
        let (x, y) = (cluster.center.x, cluster.center.y);
        report.push_str(&format!("Cluster {} center: ({x:.6}, {y:.6})", i + 1));
        if verbose {
            let total = cluster.membership_total;
            report.push_str(&format!(" membership: {total:.6}"));
        }
        report.push('\n');
    }
    if verbose {
        let (outcome, iterations) = (fit.outcome, fit.iterations);
        report.push_str(&format!("{outcome:?} after {iterations} iterations\n"));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_point() {
        let p = parse_point("1.5, -2").unwrap();
        assert_eq!(p, Point2D::new(1.5, -2.0));

        assert!(parse_point("1.5").is_err());
        assert!(parse_point("1,2,3").is_err());
        assert!(parse_point("a,2").is_err());
        assert!(parse_point("inf,2").is_err());
    }

    #[test]
    fn test_parse_convergence() {
        assert_eq!(parse_convergence("deferred").unwrap(), Convergence::Deferred);
        assert_eq!(parse_convergence("committed").unwrap(), Convergence::Committed);
        assert!(parse_convergence("eager").is_err());
    }

    #[test]
    fn test_rng_from_seed() {
        use rand::Rng as _;

        let a: u64 = rng_from_seed("abc").unwrap().gen();
        let b: u64 = rng_from_seed("abc").unwrap().gen();
        let c: u64 = rng_from_seed("abd").unwrap().gen();
        assert_eq!(a, b);
        assert_ne!(a, c);

        assert!(rng_from_seed(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_format_report() {
        let rng = rng_from_seed("").unwrap();
        let fit = fcm::FuzzyCMeans::new(rng, 2).fit(&sample_points()).unwrap();

        let report = format_report(&fit, false);
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(report.ends_with('\n'));
        for (i, (line, cluster)) in lines.iter().zip(&fit.clusters).enumerate() {
            let (x, y) = (cluster.center.x, cluster.center.y);
            let expected = format!("Cluster {} center: ({x:.6}, {y:.6})", i + 1);
            assert_eq!(*line, expected);
        }

        let report = format_report(&fit, true);
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines.len(), 3);
        let total = fit.clusters[1].membership_total;
        assert!(lines[1].ends_with(&format!(" membership: {total:.6}")));
        let summary = format!("{:?} after {} iterations", fit.outcome, fit.iterations);
        assert_eq!(lines[2], summary);
    }

    proptest!(
        #[test]
        fn parse_point_accepts_finite_pairs(x in -1e6..1e6f64, y in -1e6..1e6f64) {
            let p = parse_point(&format!("{x},{y}")).unwrap();
            prop_assert_eq!(p, Point2D::new(x, y));
        }
    );
}
