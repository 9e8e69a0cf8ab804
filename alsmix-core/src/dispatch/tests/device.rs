use alsmix_types::units::db_to_linear;
use alsmix_types::{ChangeTarget, ParamInput};

use super::*;
use crate::dispatch::Outcome;
use crate::document::track::devices;
use crate::error::ChangeError;
use crate::testing::sample_doc;

fn chain_tags(doc: &Document, index: usize) -> Vec<String> {
    devices(track(doc, index))
        .unwrap()
        .children()
        .map(|d| d.name().to_string())
        .collect()
}

#[test]
fn plain_parameter() {
    let mut doc = sample_doc();
    let desc = applied(
        &mut doc,
        nth("Snare", None, 0, param("GlueCompressor", "Ratio", ParamInput::Int(4))),
    );
    assert_eq!(desc, "Snare: GlueCompressor Ratio 2 → 4");
    let glue = &snapshot(&doc).tracks[2].devices[0];
    assert_eq!(glue.raw_value("Ratio"), Some(4.0));
}

#[test]
fn display_name_override() {
    let mut doc = sample_doc();
    let desc = applied(
        &mut doc,
        nth(
            "Snare",
            None,
            0,
            ChangeTarget::DeviceParam {
                device_tag: "GlueCompressor".into(),
                device_index: 0,
                param_name: "Attack".into(),
                param_value: ParamInput::Float(0.3),
                device_name: Some("Bus Glue".into()),
            },
        ),
    );
    assert_eq!(desc, "Snare: Bus Glue Attack 1 → 0.3");
}

#[test]
fn linear_parameter_is_addressed_in_db() {
    let mut doc = sample_doc();
    let desc = applied(
        &mut doc,
        request("Kick", param("Compressor2", "Threshold", ParamInput::Int(-24))),
    );
    assert_eq!(desc, "Kick: Compressor2 Threshold -18.1 dB → -24 dB");
    let comp = devices(track(&doc, 1)).unwrap().child("Compressor2").unwrap();
    assert_eq!(comp.param_value("Threshold"), Some(db_to_linear(Some(-24.0)).to_string().as_str()));
}

#[test]
fn nested_parameter_path() {
    let mut doc = sample_doc();
    let desc = applied(
        &mut doc,
        request("Kick", param("Eq8", "Bands.1/ParameterA/Gain", ParamInput::Float(-4.5))),
    );
    assert_eq!(desc, "Kick: Eq8 Bands.1/ParameterA/Gain -2 → -4.5");
    let eq = devices(track(&doc, 1)).unwrap().child("Eq8").unwrap();
    assert_eq!(eq.param_value("Bands.1/ParameterA/Gain"), Some("-4.5"));
}

#[test]
fn missing_device_or_parameter() {
    let mut doc = sample_doc();
    let before = doc.clone();

    let err = apply_one(&mut doc, request("Kick", param("Limiter", "Ceiling", ParamInput::Int(0))))
        .unwrap_err();
    assert_eq!(err.to_string(), "Could not find device 'Limiter' on track 'Kick'");

    let mut second_eq = param("Eq8", "GlobalGain", ParamInput::Int(0));
    if let ChangeTarget::DeviceParam { device_index, .. } = &mut second_eq {
        *device_index = 1;
    }
    assert!(matches!(
        apply_one(&mut doc, request("Kick", second_eq)),
        Err(ChangeError::DeviceNotFound { .. })
    ));

    let err = apply_one(&mut doc, request("Kick", param("Eq8", "Bands.7/ParameterA/Gain", ParamInput::Int(1))))
        .unwrap_err();
    assert_eq!(err.to_string(), "Could not set Bands.7/ParameterA/Gain on Eq8 for track 'Kick'");

    assert_eq!(doc, before);
}

#[test]
fn master_device_parameter() {
    let mut doc = sample_doc();
    let desc = applied(&mut doc, request("MASTER", param("Limiter", "Ceiling", ParamInput::Float(-1.0))));
    assert_eq!(desc, "MASTER: Limiter Ceiling -0.3 → -1");
    let limiter = &snapshot(&doc).master.unwrap().devices[0];
    assert_eq!(limiter.raw_value("Ceiling"), Some(-1.0));
}

#[test]
fn added_eq_is_a_reset_clone_with_fresh_ids() {
    let mut doc = sample_doc();
    let next = doc.max_id() + 1;
    let desc = applied(&mut doc, nth("Snare", None, 0, add("Eq8", None, &[])));
    assert_eq!(desc, "Snare: Added Eq8 at end (defaults)");
    assert_eq!(chain_tags(&doc, 2), vec!["GlueCompressor", "StereoGain", "Eq8"]);

    let eq = devices(track(&doc, 2)).unwrap().child("Eq8").unwrap();
    assert_eq!(eq.attr("Id"), Some(next.to_string().as_str()));
    assert_eq!(eq.param_value("On"), Some("true"));
    assert_eq!(eq.param_value("Bands.0/ParameterA/IsOn"), Some("false"));
    assert_eq!(eq.param_value("Bands.0/ParameterA/Gain"), Some("0"));
    assert_eq!(eq.param_value("Bands.0/ParameterA/Q"), Some("0.7071067"));
    assert_unique_ids(&doc);

    // the donor keeps its settings
    let donor = devices(track(&doc, 1)).unwrap().child("Eq8").unwrap();
    assert_eq!(donor.attr("Id"), Some("20"));
    assert_eq!(donor.param_value("Bands.0/ParameterA/Gain"), Some("3"));
}

#[test]
fn added_compressor_with_params_at_position() {
    let mut doc = sample_doc();
    let desc = applied(
        &mut doc,
        nth(
            "Snare",
            None,
            0,
            add("Compressor2", Some(0), &[("Threshold", ParamInput::Int(-18)), ("Ratio", ParamInput::Int(3))]),
        ),
    );
    assert_eq!(desc, "Snare: Added Compressor2 at position 0 (Threshold=-18, Ratio=3)");
    assert_eq!(chain_tags(&doc, 2), vec!["Compressor2", "GlueCompressor", "StereoGain"]);

    let comp = devices(track(&doc, 2)).unwrap().child("Compressor2").unwrap();
    assert_eq!(comp.param_value("Threshold"), Some(db_to_linear(Some(-18.0)).to_string().as_str()));
    assert_eq!(comp.param_value("Ratio"), Some("3"));
    assert_eq!(comp.param_value("Attack"), Some("10"));
    assert_eq!(comp.param_value("Release"), Some("100"));
    assert_eq!(comp.param_value("GainCompensation"), Some("true"));
    assert_unique_ids(&doc);
}

#[test]
fn added_device_turns_on_a_bypassed_donor() {
    let mut doc = sample_doc();
    let desc = applied(&mut doc, request("Kick", add("PluginDevice", Some(1), &[])));
    assert_eq!(desc, "Kick: Added PluginDevice at position 1 (defaults)");
    let plugin = devices(track(&doc, 1)).unwrap().nth_child(1).unwrap();
    assert_eq!(plugin.name(), "PluginDevice");
    assert_eq!(plugin.param_value("On"), Some("true"));
    assert_eq!(plugin.find("PluginDesc/VstPluginInfo/PlugName").unwrap().attr("Value"), Some("Serum"));
    assert_unique_ids(&doc);
}

#[test]
fn out_of_range_positions_append() {
    let mut doc = sample_doc();
    let desc = applied(&mut doc, request("RETURN:Reverb", add("Limiter", Some(9), &[])));
    assert_eq!(desc, "RETURN:Reverb: Added Limiter at end (defaults)");
    let desc = applied(&mut doc, request("RETURN:Reverb", add("Limiter", Some(-1), &[])));
    assert_eq!(desc, "RETURN:Reverb: Added Limiter at end (defaults)");
    assert_eq!(chain_tags(&doc, 4), vec!["Reverb", "Limiter", "Limiter"]);
    assert_unique_ids(&doc);
}

#[test]
fn no_donor_available() {
    let mut doc = sample_doc();
    let before = doc.clone();
    let err = apply_one(&mut doc, request("Kick", add("Saturator", None, &[]))).unwrap_err();
    assert_eq!(err, ChangeError::NoDonorAvailable { tag: "Saturator".into() });
    assert_eq!(err.to_string(), "No existing 'Saturator' found in project to use as template");
    assert_eq!(doc, before);
}

#[test]
fn bad_parameter_discards_the_clone() {
    let mut doc = sample_doc();
    let before = doc.clone();
    let mut ids = IdAllocator::scan(&doc);
    let start = ids.peek();

    let change = request("Kick", add("Compressor2", None, &[("Knee", ParamInput::Int(6))]));
    let err = apply_change(&mut doc, &change, &mut ids).unwrap_err();
    assert_eq!(err.to_string(), "Could not set param 'Knee' on new Compressor2 for 'Kick'");
    assert_eq!(doc, before);
    assert_eq!(ids.peek(), start);
}

#[test]
fn missing_chain_is_reported() {
    let mut doc = Document::from_xml(
        r#"<Ableton><LiveSet><Tracks>
            <AudioTrack Id="1">
                <Name><EffectiveName Value="Full" /></Name>
                <DeviceChain><DeviceChain><Devices><Reverb Id="2" /></Devices></DeviceChain></DeviceChain>
            </AudioTrack>
            <AudioTrack Id="3">
                <Name><EffectiveName Value="Bare" /></Name>
            </AudioTrack>
        </Tracks></LiveSet></Ableton>"#,
    )
    .unwrap();
    let err = apply_one(&mut doc, request("Bare", add("Reverb", None, &[]))).unwrap_err();
    assert_eq!(err, ChangeError::NoDeviceChain { track: "Bare".into() });

    let err = apply_one(&mut doc, request("Bare", volume(Some(0.0)))).unwrap_err();
    assert_eq!(err, ChangeError::MixerNotFound { track: "Bare".into() });
}

#[test]
fn ids_advance_across_inserts_in_one_batch() {
    let mut doc = sample_doc();
    let first = doc.max_id() + 1;
    let report = apply_changes(
        &mut doc,
        &[
            request("Kick", add("Eq8", None, &[])),
            request("Kick", add("Eq8", None, &[])),
        ],
    );
    assert_eq!(report.error_count(), 0);
    let eqs: Vec<&str> = devices(track(&doc, 1))
        .unwrap()
        .children()
        .filter(|d| d.name() == "Eq8")
        .filter_map(|d| d.attr("Id"))
        .collect();
    // the donor keeps Id 20; each clone takes three ids (device, two automation targets)
    assert_eq!(eqs, vec!["20".to_string(), first.to_string(), (first + 3).to_string()]);
    assert_unique_ids(&doc);
}

#[test]
fn later_requests_see_inserted_devices() {
    let mut doc = sample_doc();
    let report = apply_changes(
        &mut doc,
        &[
            nth("Snare", None, 1, add("Compressor2", None, &[])),
            nth("Snare", None, 1, param("Compressor2", "Ratio", ParamInput::Int(8))),
        ],
    );
    let descriptions: Vec<&str> = report.descriptions().collect();
    assert_eq!(
        descriptions,
        vec![
            "Snare: Added Compressor2 at end (defaults)",
            "Snare: Compressor2 Ratio 2 → 8",
        ]
    );
    assert!(matches!(report.results[1].outcome, Ok(Outcome::Applied(_))));
}
