use std::time::{Duration, Instant};

use anyhow::Context as _;
use sha2::Digest as _;
use tilepaint::{
    Affine, Interpolation, Paint, Rect, RenderingHints, Surface, SurfaceOpts, TexturePaint,
    TransformedTexturePaint,
};

const SURFACE_SIZE: u32 = 600;
const TEXTURE_SIZE: u32 = 400;
const RECT_COUNT: usize = 200;

#[derive(Clone, Debug)]
struct BenchArgs {
    warmup: u32,
    repeats: u32,
    tolerance_pct: f64,
    case: Option<String>,
    fail_on_verdict: bool,
}

/// Shared inputs for every case.
struct Fixture {
    sheared: TransformedTexturePaint,
    identity: TransformedTexturePaint,
    bare: TexturePaint,
    rects: Vec<Rect>,
}

type Render = fn(&Fixture) -> anyhow::Result<Surface>;

struct Case {
    name: &'static str,
    about: &'static str,
    baseline: Render,
    candidate: Render,
    /// Candidate/baseline ratio the case is expected to stay under.
    budget: f64,
    /// Both paths must produce the same pixels.
    same_output: bool,
}

#[derive(Clone, Debug, Default)]
struct RunMetrics {
    baseline: Duration,
    candidate: Duration,
}

struct CaseReport {
    name: &'static str,
    baseline_median: Duration,
    candidate_median: Duration,
    ratio: f64,
    pass: bool,
    deterministic: bool,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;
    if args.repeats == 0 {
        anyhow::bail!("--repeats must be >= 1");
    }
    if !args.tolerance_pct.is_finite() || args.tolerance_pct < 0.0 {
        anyhow::bail!("--tolerance-pct must be a finite value >= 0");
    }

    let fixture = build_fixture()?;
    let cases: Vec<Case> = all_cases()
        .into_iter()
        .filter(|c| args.case.as_deref().is_none_or(|n| n == c.name))
        .collect();
    if cases.is_empty() {
        anyhow::bail!(
            "unknown --case '{}' (expected one of: {})",
            args.case.as_deref().unwrap_or_default(),
            all_cases()
                .iter()
                .map(|c| c.name)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    eprintln!(
        "bench: {repeats} run(s) ({profile} build), surface {SURFACE_SIZE}x{SURFACE_SIZE}, \
         {RECT_COUNT} rects, texture {TEXTURE_SIZE}x{TEXTURE_SIZE}, tolerance {tol}%",
        repeats = args.repeats,
        profile = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        tol = args.tolerance_pct,
    );

    let mut reports = Vec::with_capacity(cases.len());
    for case in &cases {
        reports.push(run_case(case, &fixture, &args)?);
    }

    report_table(&reports);
    if reports.iter().any(|r| !r.deterministic) {
        anyhow::bail!("non-deterministic output detected");
    }
    let failed = failed_cases(&reports);
    if args.fail_on_verdict && !failed.is_empty() {
        anyhow::bail!("over budget: {}", failed.join(", "));
    }
    Ok(())
}

fn all_cases() -> Vec<Case> {
    vec![
        Case {
            name: "sheared_fills",
            about: "sheared pattern fills, sequential vs row-parallel surface",
            baseline: |f| fill_rects(&f.sheared, &f.rects, None, false),
            candidate: |f| fill_rects(&f.sheared, &f.rects, None, true),
            budget: 1.0,
            same_output: true,
        },
        Case {
            name: "identity_wrap",
            about: "bare texture paint vs identity-wrapped paint",
            baseline: |f| fill_rects(&f.bare, &f.rects, None, false),
            candidate: |f| fill_rects(&f.identity, &f.rects, None, false),
            budget: 1.0,
            same_output: true,
        },
        Case {
            name: "bilinear",
            about: "sheared pattern fills, nearest vs bilinear sampling",
            baseline: |f| fill_rects(&f.sheared, &f.rects, None, false),
            candidate: |f| {
                let hints = RenderingHints::new().with(Interpolation::Bilinear);
                fill_rects(&f.sheared, &f.rects, Some(&hints), false)
            },
            budget: 4.0,
            same_output: false,
        },
    ]
}

fn build_fixture() -> anyhow::Result<Fixture> {
    let image = tilepaint::noise_image(TEXTURE_SIZE, TEXTURE_SIZE, 0x5eed)?;
    let anchor = Rect::new(5.0, 5.0, 105.0, 105.0);
    let shear = tilepaint::transform::affine::from_coeffs([1.0, 0.1, 0.1, 1.0, 0.0, 0.0])?;

    let bare = TexturePaint::new(image.clone(), anchor)?;
    Ok(Fixture {
        sheared: TransformedTexturePaint::new(image, anchor, Some(shear))?,
        identity: TransformedTexturePaint::from_texture(bare.clone(), None),
        bare,
        rects: random_rects(RECT_COUNT, 0xbe7c),
    })
}

/// Deterministic rectangles inside the surface, 10..=200 px on a side.
fn random_rects(n: usize, seed: u64) -> Vec<Rect> {
    let max = f64::from(SURFACE_SIZE);
    (0..n)
        .map(|i| {
            let key = (i as u64).to_le_bytes();
            let h = |k: u64| xxhash_rust::xxh3::xxh3_64_with_seed(&key, seed ^ k);
            let unit = |k: u64| (h(k) >> 11) as f64 / (1u64 << 53) as f64;
            let w = 10.0 + unit(1) * 190.0;
            let hgt = 10.0 + unit(2) * 190.0;
            let x = unit(3) * (max - w);
            let y = unit(4) * (max - hgt);
            Rect::new(x, y, x + w, y + hgt)
        })
        .collect()
}

fn fill_rects(
    paint: &dyn Paint,
    rects: &[Rect],
    hints: Option<&RenderingHints>,
    parallel: bool,
) -> anyhow::Result<Surface> {
    let opts = SurfaceOpts::default()
        .with_clear_rgba(Some([255, 255, 255, 255]))
        .with_parallel(parallel);
    let mut surface = Surface::with_opts(SURFACE_SIZE, SURFACE_SIZE, opts)?;
    for r in rects {
        surface.fill_rect(*r, paint, Affine::IDENTITY, hints)?;
    }
    Ok(surface)
}

fn run_case(case: &Case, fixture: &Fixture, args: &BenchArgs) -> anyhow::Result<CaseReport> {
    eprintln!("\ncase {}: {}", case.name, case.about);
    for _ in 0..args.warmup {
        let _ = (case.baseline)(fixture)?;
        let _ = (case.candidate)(fixture)?;
    }

    let mut runs = Vec::<RunMetrics>::with_capacity(args.repeats as usize);
    let mut digests: Option<(String, String)> = None;
    let mut deterministic = true;
    for i in 0..args.repeats {
        let t0 = Instant::now();
        let base =
            (case.baseline)(fixture).with_context(|| format!("{} baseline", case.name))?;
        let baseline = t0.elapsed();

        let t0 = Instant::now();
        let cand =
            (case.candidate)(fixture).with_context(|| format!("{} candidate", case.name))?;
        let candidate = t0.elapsed();

        let pair = (sha256_hex(base.data()), sha256_hex(cand.data()));
        match &digests {
            None => {
                eprintln!("  baseline  sha256: {}", pair.0);
                eprintln!("  candidate sha256: {}", pair.1);
                if case.same_output && pair.0 != pair.1 {
                    eprintln!("  mismatch: baseline and candidate pixels differ");
                    deterministic = false;
                }
                digests = Some(pair);
            }
            Some(first) if *first != pair => {
                eprintln!("  run {i}: digest changed across repeats");
                deterministic = false;
            }
            Some(_) => {}
        }
        runs.push(RunMetrics {
            baseline,
            candidate,
        });
    }

    report_percentiles(&runs);

    let mut base = runs.iter().map(|m| m.baseline).collect::<Vec<_>>();
    let mut cand = runs.iter().map(|m| m.candidate).collect::<Vec<_>>();
    base.sort();
    cand.sort();
    let baseline_median = p(&base, 0.50);
    let candidate_median = p(&cand, 0.50);
    let ratio = candidate_median.as_secs_f64() / baseline_median.as_secs_f64().max(1e-9);
    Ok(CaseReport {
        name: case.name,
        baseline_median,
        candidate_median,
        ratio,
        pass: ratio <= case.budget * (1.0 + args.tolerance_pct / 100.0),
        deterministic,
    })
}

fn failed_cases(reports: &[CaseReport]) -> Vec<&'static str> {
    reports.iter().filter(|r| !r.pass).map(|r| r.name).collect()
}

fn p(v: &[Duration], p: f64) -> Duration {
    if v.is_empty() {
        return Duration::ZERO;
    }
    let n = v.len();
    let rank = (p * (n as f64)).ceil().clamp(1.0, n as f64) as usize;
    v[rank - 1]
}

fn fmt_ms(d: Duration) -> String {
    format!("{:.3}ms", d.as_secs_f64() * 1000.0)
}

fn report_percentiles(runs: &[RunMetrics]) {
    type Getter = fn(&RunMetrics) -> Duration;
    let fields: &[(&str, Getter)] = &[
        ("baseline", |m| m.baseline),
        ("candidate", |m| m.candidate),
    ];

    eprintln!("  percentiles across runs (p50/p90/p99):");
    for (name, getter) in fields {
        let mut v = runs.iter().map(*getter).collect::<Vec<_>>();
        v.sort();
        eprintln!(
            "    {name:10} p50={p50:>10}  p90={p90:>10}  p99={p99:>10}",
            p50 = fmt_ms(p(&v, 0.50)),
            p90 = fmt_ms(p(&v, 0.90)),
            p99 = fmt_ms(p(&v, 0.99)),
        );
    }
}

fn report_table(reports: &[CaseReport]) {
    println!(
        "\n{:16} {:>12} {:>12} {:>8} {:>7} {:>6}",
        "case", "baseline", "candidate", "ratio", "verdict", "det"
    );
    for r in reports {
        println!(
            "{:16} {:>12} {:>12} {:>8.3} {:>7} {:>6}",
            r.name,
            fmt_ms(r.baseline_median),
            fmt_ms(r.candidate_median),
            r.ratio,
            if r.pass { "P" } else { "F" },
            if r.deterministic { "ok" } else { "FAIL" },
        );
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        warmup: 1,
        repeats: 20,
        tolerance_pct: 25.0,
        case: None,
        fail_on_verdict: false,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--warmup" => out.warmup = parse_u32(args.next(), "--warmup")?,
            "--repeats" => out.repeats = parse_u32(args.next(), "--repeats")?,
            "--tolerance-pct" => out.tolerance_pct = parse_f64(args.next(), "--tolerance-pct")?,
            "--case" => {
                out.case = Some(args.next().ok_or_else(|| {
                    anyhow::anyhow!("missing value for --case (expected a case name)")
                })?)
            }
            "--fail-on-verdict" => out.fail_on_verdict = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        r#"tilepaint-bench

Fills random rectangles on a {SURFACE_SIZE}x{SURFACE_SIZE} surface with tiling paints and compares
a baseline path against a candidate path for each case.

Usage:
  cargo run -q --release
  cargo run -q --release -- --repeats 50 --case identity_wrap

Args:
  --warmup N           (default 1)
  --repeats N          (default 20)
  --tolerance-pct P    allowed slack over each case's ratio budget (default 25)
  --case NAME          sheared_fills | identity_wrap | bilinear (default all)
  --fail-on-verdict    exit non-zero when any case reports F

The P/F verdict is informational unless --fail-on-verdict is given. Non-deterministic
output always fails the run.
"#
    );
}

fn parse_u32(v: Option<String>, flag: &str) -> anyhow::Result<u32> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<u32>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

fn parse_f64(v: Option<String>, flag: &str) -> anyhow::Result<f64> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<f64>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}
