use std::path::Path;

use gendercast::{
    extract_gender_features, ClassifierAdapter, FeatureKey, FeatureMapping, GenderCastError,
    Label, PredictionSource, Result, Shell, ShellConfig,
};

fn write_model(dir: &Path) -> std::path::PathBuf {
    let model = serde_json::json!({
        "labels": [
            { "label": "female", "log_prob": (0.63f64).ln() },
            { "label": "male", "log_prob": (0.37f64).ln() }
        ],
        "features": [
            {
                "label": "female", "feature": "suffix",
                "values": { "a": (0.38f64).ln(), "e": (0.29f64).ln(), "y": (0.07f64).ln() },
                "unseen": (0.001f64).ln()
            },
            {
                "label": "male", "feature": "suffix",
                "values": { "n": (0.16f64).ln(), "r": (0.05f64).ln(), "d": (0.08f64).ln() },
                "unseen": (0.002f64).ln()
            },
            {
                "label": "female", "feature": "suffix2",
                "values": { "na": (0.06f64).ln(), "ra": (0.03f64).ln() },
                "unseen": (0.004f64).ln()
            },
            {
                "label": "male", "feature": "suffix2",
                "values": { "er": (0.03f64).ln(), "rd": (0.02f64).ln() },
                "unseen": (0.003f64).ln()
            }
        ]
    });

    let path = dir.join("gender_prediction.json");
    std::fs::write(&path, model.to_string()).unwrap();
    path
}

fn shell_for(path: std::path::PathBuf) -> Shell {
    let config = ShellConfig {
        model_path: path,
        ..ShellConfig::default()
    };
    Shell::new(ClassifierAdapter::from_config(&config), config)
}

#[test]
fn trained_model_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell_for(write_model(dir.path()));

    assert!(shell.adapter().is_available());

    let zara = shell.predict("Zara");
    assert_eq!(zara.result.as_ref().unwrap().label, "female");
    assert_eq!(zara.result.as_ref().unwrap().source, PredictionSource::Model);

    let peter = shell.predict("PETER");
    assert_eq!(peter.result.as_ref().unwrap().label, "male");
    assert_eq!(shell.render(&peter), "Predicted gender for \"PETER\": 👦 MALE");
}

#[test]
fn case_does_not_change_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell_for(write_model(dir.path()));

    let labels: Vec<Label> = ["ann", "ANN", "Ann"]
        .iter()
        .map(|n| shell.predict(n).result.unwrap().label)
        .collect();

    assert!(labels.iter().all(|l| *l == labels[0]));
}

#[test]
fn missing_model_reports_unavailable_for_every_request() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell_for(dir.path().join("nope.json"));

    for name in ["Zara", "Peter", "Q"] {
        let outcome = shell.predict(name);
        assert!(matches!(
            outcome.result,
            Err(GenderCastError::ModelUnavailable { .. })
        ));
        assert!(shell.render(&outcome).starts_with("Prediction unavailable: "));
    }
}

#[test]
fn stub_classifier_is_injected() {
    let shell = Shell::new(
        ClassifierAdapter::with_classifier(|_: &FeatureMapping| -> Result<Label> {
            Ok(Label::from("female"))
        }),
        ShellConfig::default(),
    );

    assert_eq!(shell.predict("Zara").result.unwrap().label, "female");
    assert_eq!(shell.predict("").result, Err(GenderCastError::EmptyInput));
}

#[test]
fn probabilities_available_from_trained_model() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = ClassifierAdapter::load(write_model(dir.path())).unwrap();

    let dist = adapter
        .probabilities(&extract_gender_features("Anna"))
        .unwrap()
        .unwrap();
    let total: f64 = dist.entries().iter().map(|(_, p)| p).sum();

    assert!((total - 1.0).abs() < 1e-9);
    assert!(dist.probability("female").unwrap() > 0.99);
}

#[test]
fn most_informative_features_names_only_known_keys() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = ClassifierAdapter::load(write_model(dir.path())).unwrap();

    let ranked = adapter.most_informative_features(5).unwrap();
    assert_eq!(ranked.len(), 5);
    for feature in &ranked {
        assert!(feature.feature.parse::<FeatureKey>().is_ok());
        assert!(feature.ratio >= 1.0);
    }
    for pair in ranked.windows(2) {
        assert!(pair[0].ratio >= pair[1].ratio);
    }
}

#[test]
fn batch_file_style_input() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell_for(write_model(dir.path()));

    let names: Vec<String> = "Anna\n\nRichard\n  Eve  \n"
        .lines()
        .map(str::to_string)
        .collect();
    let outcomes = shell.predict_batch(&names);

    let rendered: Vec<String> = outcomes.iter().map(|o| shell.render(o)).collect();
    assert_eq!(
        rendered,
        vec![
            "Predicted gender for \"Anna\": 👧 FEMALE".to_string(),
            "Input cannot be empty. Type a name.".to_string(),
            "Predicted gender for \"Richard\": 👦 MALE".to_string(),
            "Predicted gender for \"Eve\": 👧 FEMALE".to_string(),
        ]
    );
}
