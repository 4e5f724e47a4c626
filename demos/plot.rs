use mathviz_core::ast::Evaluator;
use mathviz_core::{Domain, SampleSeries};
use std::collections::HashMap;
use std::env::args;

const USAGE: &str = r"Plot a function of `x` in the terminal.

Usage: plot EXPR [XMIN XMAX]

Example: plot 'sin(PI * x) / x' -4 4";

const WIDTH: usize = 72;
const HEIGHT: usize = 20;

fn main() {
    pretty_env_logger::init();

    let args: Vec<String> = args().skip(1).collect();
    let Some(expression) = args.first() else {
        return println!("{}", USAGE);
    };
    let bound = |i: usize, default: f64| {
        args.get(i)
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(default)
    };
    let domain = Domain::new(bound(1, -10.0), bound(2, 10.0), WIDTH - 1);

    let mut evaluator = Evaluator::default();
    let series = evaluator.sample(expression, &HashMap::new(), "x", domain);
    if series.is_empty() {
        return println!("Nothing to plot for `{}`", expression);
    }

    print!("{}", render(&series, domain));
    println!(
        "{} of {} points plotted, x in [{}, {}]",
        series.len(),
        domain.sample_count(),
        domain.min,
        domain.max
    );
}

fn render(series: &SampleSeries, domain: Domain) -> String {
    let (low, high) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    let span = if high > low { high - low } else { 1.0 };
    let x_span = if domain.max != domain.min {
        domain.max - domain.min
    } else {
        1.0
    };

    let mut grid = vec![vec![' '; WIDTH]; HEIGHT];
    for point in series {
        let column = (((point.x - domain.min) / x_span) * (WIDTH - 1) as f64).round() as usize;
        let row = (((high - point.y) / span) * (HEIGHT - 1) as f64).round() as usize;
        grid[row.min(HEIGHT - 1)][column.min(WIDTH - 1)] = '*';
    }

    let mut out = format!("{:>10.3} ┐\n", high);
    for row in grid {
        out.push_str("           │");
        out.extend(row);
        out.push('\n');
    }
    out.push_str(&format!("{:>10.3} ┘\n", low));
    out
}
