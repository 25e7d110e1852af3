use anyhow::{bail, Context, Result};
use nlfm::kernel::KernelLifecycle;
use nlfm::radar::analysis::{
    autocorrelation_db, PsdConfig, PsdKernel, SpectrumConfig, SpectrumKernel,
};
use nlfm::radar::{design_chirp, ChirpDesign, DesignWarning};
use nlfm::signal::windows::{get_window, GetWindow, GetWindowBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Relative bandwidth error a sweep case must stay under to pass.
const BANDWIDTH_TOLERANCE: f64 = 1e-3;

/// Fraction of sweep cases that must pass.
const REQUIRED_PASS_RATE: f64 = 0.95;

const SWEEP_BANDWIDTHS_HZ: [f64; 7] = [1e3, 3e3, 1e4, 3e4, 1e5, 3e5, 1e6];
const SWEEP_DURATIONS_S: [f64; 5] = [1e-4, 3e-4, 1e-3, 3e-3, 1e-2];

/// Pulses longer than this are skipped to keep the sweep fast.
const MAX_SWEEP_SAMPLES: f64 = 65_536.0;

#[derive(Debug, Serialize, Deserialize, Clone)]
struct SweepRow {
    case_id: String,
    window: String,
    bandwidth_hz: f64,
    duration_s: f64,
    sample_rate_hz: f64,
    samples: usize,
    evaluations: usize,
    converged: bool,
    swept_bandwidth_hz: f64,
    relative_error: f64,
    passed: bool,
    nyquist_warning: bool,
    design_ns: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SweepBundle {
    generated_epoch_seconds: u64,
    tolerance: f64,
    passed: usize,
    total: usize,
    pass_rate: f64,
    rows: Vec<SweepRow>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SpectrumReport {
    generated_epoch_seconds: u64,
    window: String,
    sample_rate_hz: f64,
    frequency_hz: Vec<f64>,
    magnitude_db: Vec<f64>,
    autocorrelation_db: Vec<f64>,
    psd_frequency_hz: Vec<f64>,
    psd_db_per_hz: Vec<f64>,
    psd_autocorrelation_db: Vec<f64>,
    time_s: Vec<f64>,
    instantaneous_frequency_hz: Vec<f64>,
    chirp_rate_hz_per_s: Vec<f64>,
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("sweep") => run_sweep(),
        Some("spectrum") => run_spectrum(args.next().as_deref().unwrap_or("hamming")),
        _ => {
            eprintln!("Usage:");
            eprintln!("  cargo run -p xtask -- sweep");
            eprintln!("  cargo run -p xtask -- spectrum [hamming|gaussian|boxcar|blackman]");
            Ok(())
        }
    }
}

fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn output_dir(kind: &str, ts: u64) -> Result<PathBuf> {
    let out_dir = PathBuf::from(format!("target/{kind}/{ts}"));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {} output directory", out_dir.display()))?;
    Ok(out_dir)
}

fn target_window(name: &str, nx: usize) -> Result<Vec<f64>> {
    let builder = match name {
        "hamming" => GetWindowBuilder::Hamming,
        "gaussian" => GetWindowBuilder::Gaussian { std: nx as f64 / 8.0 },
        "boxcar" => GetWindowBuilder::Boxcar,
        "blackman" => GetWindowBuilder::Blackman,
        other => bail!("unknown window `{other}`"),
    };
    Ok(get_window(builder, nx, Some(false)).get_window())
}

fn run_sweep() -> Result<()> {
    let ts = epoch_seconds();
    let out_dir = output_dir("sweeps", ts)?;

    let mut rows = Vec::new();
    for name in ["gaussian", "hamming", "boxcar"] {
        let window = target_window(name, 64)?;
        for &bandwidth in &SWEEP_BANDWIDTHS_HZ {
            for &duration in &SWEEP_DURATIONS_S {
                // f0 = Ω keeps the band positive; 4Ω keeps it under Nyquist.
                let fs = (4.0 * bandwidth).max(256.0 / duration);
                if fs * duration > MAX_SWEEP_SAMPLES {
                    log::info!("skipping {name} Ω={bandwidth} T={duration}: pulse too long");
                    continue;
                }
                let case_id = format!("{name}_bw{bandwidth:e}_t{duration:e}");
                let (design, design_ns) =
                    design_case(&case_id, &window, duration, bandwidth, fs)?;
                rows.push(build_row(&case_id, name, &design, design_ns));
            }
        }
    }

    let passed = rows.iter().filter(|row| row.passed).count();
    let total = rows.len();
    let pass_rate = passed as f64 / total.max(1) as f64;
    let bundle = SweepBundle {
        generated_epoch_seconds: ts,
        tolerance: BANDWIDTH_TOLERANCE,
        passed,
        total,
        pass_rate,
        rows,
    };

    write_summary_csv(&out_dir.join("summary.csv"), &bundle.rows)?;
    fs::write(
        out_dir.join("summary.json"),
        serde_json::to_vec_pretty(&bundle).context("serializing sweep bundle")?,
    )
    .context("writing summary.json")?;

    println!("Sweep artifacts generated in: {}", out_dir.display());
    println!("  - {}", out_dir.join("summary.csv").display());
    println!("  - {}", out_dir.join("summary.json").display());
    println!("  - cases: {total}, passed: {passed} ({:.1}%)", 100.0 * pass_rate);

    if pass_rate < REQUIRED_PASS_RATE {
        bail!(
            "bandwidth sweep pass rate {:.3} below required {REQUIRED_PASS_RATE}",
            pass_rate
        );
    }
    Ok(())
}

/// Design one sweep case centred at `f0 = Ω` and time it.
fn design_case(
    case_id: &str,
    window: &[f64],
    duration: f64,
    bandwidth: f64,
    fs: f64,
) -> Result<(ChirpDesign<f64>, f64)> {
    let start = Instant::now();
    let design = design_chirp(window, true, duration, bandwidth, bandwidth, fs)
        .with_context(|| format!("{case_id}: design failed"))?;
    Ok((design, start.elapsed().as_nanos() as f64))
}

fn build_row(case_id: &str, window: &str, design: &ChirpDesign<f64>, design_ns: f64) -> SweepRow {
    let spec = design.spec();
    let summary = design.summary();
    let relative_error = (summary.swept_bandwidth - spec.bandwidth_hz()).abs() / spec.bandwidth_hz();
    SweepRow {
        case_id: case_id.to_string(),
        window: window.to_string(),
        bandwidth_hz: spec.bandwidth_hz(),
        duration_s: spec.duration_s(),
        sample_rate_hz: spec.sample_rate_hz(),
        samples: design.samples().len(),
        evaluations: summary.evaluations,
        converged: summary.converged,
        swept_bandwidth_hz: summary.swept_bandwidth,
        relative_error,
        passed: relative_error <= BANDWIDTH_TOLERANCE,
        nyquist_warning: design
            .warnings()
            .iter()
            .any(|w| matches!(w, DesignWarning::Nyquist { .. })),
        design_ns,
    }
}

fn run_spectrum(window_name: &str) -> Result<()> {
    let ts = epoch_seconds();
    let out_dir = output_dir("spectra", ts)?;

    let fs = 200e3;
    let window = target_window(window_name, 64)?;
    let design = design_chirp(&window, true, 1e-3, 10e3, 20e3, fs)
        .context("reference design failed")?;

    let spectrum = SpectrumKernel::try_new(SpectrumConfig::new(fs))
        .context("spectrum kernel config")?;
    let magnitude_db = spectrum
        .magnitude_db(design.samples())
        .context("magnitude spectrum")?;
    let acf = autocorrelation_db(design.samples()).context("autocorrelation")?;
    let psd = PsdKernel::try_new(PsdConfig::new(fs)).context("psd kernel config")?;
    let psd_db_per_hz = psd.density_db(design.samples()).context("welch density")?;
    let psd_acf = psd
        .autocorrelation_db(design.samples())
        .context("density autocorrelation")?;

    let report = SpectrumReport {
        generated_epoch_seconds: ts,
        window: window_name.to_string(),
        sample_rate_hz: fs,
        frequency_hz: spectrum.frequencies(),
        magnitude_db,
        autocorrelation_db: acf,
        psd_frequency_hz: psd.frequencies(),
        psd_db_per_hz,
        psd_autocorrelation_db: psd_acf,
        time_s: design.time().to_vec(),
        instantaneous_frequency_hz: design.frequency().to_vec(),
        chirp_rate_hz_per_s: design.chirp_rate().to_vec(),
    };
    let path = out_dir.join("spectrum.json");
    fs::write(
        &path,
        serde_json::to_vec_pretty(&report).context("serializing spectrum report")?,
    )
    .with_context(|| format!("writing {}", path.display()))?;

    println!("Spectrum report generated in: {}", path.display());
    Ok(())
}

fn write_summary_csv(path: &Path, rows: &[SweepRow]) -> Result<()> {
    let mut out = String::new();
    out.push_str("case_id,window,bandwidth_hz,duration_s,sample_rate_hz,samples,evaluations,converged,swept_bandwidth_hz,relative_error,passed,nyquist_warning,design_ns\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{:.3},{:.9},{:.3},{},{},{},{:.6},{:.3e},{},{},{:.0}\n",
            row.case_id,
            row.window,
            row.bandwidth_hz,
            row.duration_s,
            row.sample_rate_hz,
            row.samples,
            row.evaluations,
            row.converged,
            row.swept_bandwidth_hz,
            row.relative_error,
            row.passed,
            row.nyquist_warning,
            row.design_ns
        ));
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}
