//! End-to-end reconstruction with a stand-in estimator

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use hound::{SampleFormat, WavSpec, WavWriter};
use pitchtrace_contour::{
    AudioSource, CollaboratorError, ContourError, EstimateRequest, ParameterOverrides,
    ParameterSet, PitchAnalyzer, SparseEstimate,
};
use pitchtrace_params::reconcile_floor;

fn fake<F>(f: F) -> F
where
    F: Fn(&EstimateRequest<'_>) -> Result<SparseEstimate, CollaboratorError>,
{
    f
}

/// Silent mono 16-bit WAV of `samples` frames
fn write_wav(dir: &Path, sample_rate: u32, samples: usize) -> PathBuf {
    let path = dir.join("speech.wav");
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for _ in 0..samples {
        writer.write_sample(0_i16).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn test_gap_example_from_wav() {
    let tmp = tempfile::tempdir().unwrap();
    let wav = write_wav(tmp.path(), 16000, 1280); // 0.08 s

    let analyzer = PitchAnalyzer::new(fake(|_| {
        SparseEstimate::from_pairs(&[(0.00, 100.0), (0.01, 105.0), (0.02, 98.0), (0.05, 110.0)])
    }));
    let contour = analyzer.analyze_file(&wav, None).unwrap();

    assert_eq!(contour.rate(), 100);
    assert_eq!(contour.len(), 8);
    let voiced: Vec<usize> = contour
        .pitch()
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.map(|_| i))
        .collect();
    assert_eq!(voiced, vec![0, 1, 2, 5]);
    assert_eq!(contour.pitch()[3], None);
    assert_eq!(contour.pitch()[4], None);
    assert_eq!(contour.pitch()[5], Some(110.0));
}

#[test]
fn test_regular_estimate_round_trips() {
    for &rate in &[50_u32, 100, 200, 1000] {
        for &duration in &[0.5, 1.0, 2.34] {
            let slots = (duration * rate as f64).round_ties_even() as usize;
            let pairs: Vec<(f64, f64)> = (0..slots)
                .map(|i| (i as f64 / rate as f64, 80.0 + i as f64 * 0.5))
                .collect();
            let sparse = SparseEstimate::from_pairs(&pairs).unwrap();

            let audio =
                AudioSource::from_samples("a.wav", 8000, vec![0.0; (duration * 8000.0).round() as usize])
                    .unwrap();
            let analyzer = PitchAnalyzer::new(fake(|_| Ok(sparse.clone())));
            let contour = analyzer.reconstruct(&audio, &ParameterSet::default()).unwrap();

            assert_eq!(contour.rate(), rate);
            assert_eq!(contour.len(), slots, "rate {} duration {}", rate, duration);
            assert_eq!(contour.voiced_count(), slots, "rate {} duration {}", rate, duration);
            assert_eq!(contour.dropped(), 0);
            for (i, (_, pitch)) in pairs.iter().enumerate() {
                assert_eq!(contour.pitch()[i], Some(*pitch));
            }
        }
    }
}

#[test]
fn test_length_follows_duration_and_rate() {
    let sparse = SparseEstimate::from_pairs(&[(0.1, 120.0), (0.11, 121.0), (0.3, 119.0)]).unwrap();

    for &(sample_rate, samples) in &[(16000_u32, 16000_usize), (44100, 22050), (8000, 12345), (22050, 1)] {
        let audio = AudioSource::from_samples("a.wav", sample_rate, vec![0.0; samples]).unwrap();
        let analyzer = PitchAnalyzer::new(fake(|_| Ok(sparse.clone())));

        match analyzer.reconstruct(&audio, &ParameterSet::default()) {
            Ok(contour) => {
                let expected = (audio.duration_secs() * 100.0).round_ties_even() as usize;
                assert_eq!(contour.len(), expected);
                assert_eq!(contour.time().len(), contour.pitch().len());
                for (i, t) in contour.time().iter().enumerate() {
                    assert_relative_eq!(*t, i as f64 / 100.0);
                }
            }
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
}

#[test]
fn test_contour_shorter_than_estimate_drops_tail() {
    // 0.2 s of audio, estimate runs to 0.3 s
    let sparse = SparseEstimate::from_pairs(&[(0.1, 120.0), (0.11, 121.0), (0.3, 119.0)]).unwrap();
    let audio = AudioSource::from_samples("a.wav", 16000, vec![0.0; 3200]).unwrap();
    let analyzer = PitchAnalyzer::new(fake(|_| Ok(sparse.clone())));

    let contour = analyzer.reconstruct(&audio, &ParameterSet::default()).unwrap();
    assert_eq!(contour.len(), 20);
    assert_eq!(contour.voiced_count(), 2);
    assert_eq!(contour.dropped(), 1);
}

#[test]
fn test_collision_later_sample_wins() {
    let audio = AudioSource::from_samples("a.wav", 16000, vec![0.0; 1600]).unwrap();
    let analyzer = PitchAnalyzer::new(fake(|_| {
        SparseEstimate::from_pairs(&[(0.00, 100.0), (0.009, 140.0), (0.02, 150.0)])
    }));

    let contour = analyzer.reconstruct(&audio, &ParameterSet::default()).unwrap();
    // min spacing 0.009 s rounds to 111 Hz
    assert_eq!(contour.rate(), 111);
    assert_eq!(contour.pitch()[0], Some(140.0));
    assert_eq!(contour.pitch()[2], Some(150.0));
}

#[test]
fn test_empty_estimate_returns_no_contour() {
    let tmp = tempfile::tempdir().unwrap();
    let wav = write_wav(tmp.path(), 16000, 16000);

    let analyzer = PitchAnalyzer::new(fake(|_| SparseEstimate::parse("")));
    let err = analyzer.analyze_file(&wav, None).unwrap_err();
    assert!(matches!(err, ContourError::EmptyEstimate));
}

#[test]
fn test_single_sample_estimate() {
    let audio = AudioSource::from_samples("a.wav", 16000, vec![0.0; 16000]).unwrap();
    let analyzer = PitchAnalyzer::new(fake(|_| SparseEstimate::from_pairs(&[(0.5, 200.0)])));

    let err = analyzer.reconstruct(&audio, &ParameterSet::default()).unwrap_err();
    assert!(matches!(err, ContourError::UnresolvableRate { samples: 1 }));
}

#[test]
fn test_overrides_reach_the_estimator_resolved() {
    let tmp = tempfile::tempdir().unwrap();
    let wav = write_wav(tmp.path(), 16000, 16000);

    let seen = RefCell::new(None);
    let analyzer = PitchAnalyzer::new(fake(|request| {
        assert_eq!(request.audio_path, wav.as_path());
        *seen.borrow_mut() = Some(*request.parameters);
        SparseEstimate::from_pairs(&[(0.0, 180.0), (0.005, 181.0)])
    }));

    let overrides = ParameterOverrides::new()
        .set("time_step", 0.005)
        .set("pitch_floor", 300)
        .set("max_n_candidates", 4)
        .set("colour", 1);
    let contour = analyzer.analyze_file(&wav, Some(&overrides)).unwrap();

    let used = (*seen.borrow()).unwrap();
    assert_eq!(used.time_step, 0.005);
    assert_eq!(used.max_candidates, 4);
    assert_eq!(used.pitch_floor, reconcile_floor(300.0, 0.005));
    assert_eq!(contour.parameters(), &used);
    assert_eq!(contour.rate(), 200);
    assert_eq!(contour.len(), 200);

    let (pitch, time, parameters) = contour.into_parts();
    assert_eq!(pitch.len(), time.len());
    assert_eq!(parameters, used);
}
