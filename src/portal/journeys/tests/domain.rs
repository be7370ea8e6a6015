use chrono::{TimeZone, Utc};
use serde_json::json;

use crate::portal::journeys::domain::{
    parse_schedule, plan_stage_change, JourneyStage, StageEffect,
};

#[test]
fn every_stage_label_round_trips_through_parse() {
    for stage in JourneyStage::ALL {
        assert_eq!(JourneyStage::parse(stage.label()), Some(stage));
    }
    assert_eq!(JourneyStage::parse("HIRED"), None);
    assert_eq!(JourneyStage::parse("placed"), None);
    assert_eq!(JourneyStage::parse(""), None);
}

#[test]
fn stages_serialize_as_their_wire_literals() {
    assert_eq!(
        serde_json::to_value(JourneyStage::FirstInterview).expect("serializes"),
        json!("FIRST_INTERVIEW")
    );
    assert_eq!(
        serde_json::to_value(JourneyStage::TrialDay).expect("serializes"),
        json!("TRIAL_DAY")
    );
    let parsed: JourneyStage = serde_json::from_value(json!("WITHDRAWN")).expect("deserializes");
    assert_eq!(parsed, JourneyStage::Withdrawn);
}

#[test]
fn entering_placed_always_plans_the_placement_effect() {
    for from in [None, Some(JourneyStage::Placed), Some(JourneyStage::Rejected)] {
        let change = plan_stage_change(from, JourneyStage::Placed);
        assert_eq!(change.from, from);
        assert_eq!(change.to, JourneyStage::Placed);
        assert_eq!(change.effect, Some(StageEffect::RecordPlacement));
    }
}

#[test]
fn leaving_placed_plans_no_effect() {
    let change = plan_stage_change(Some(JourneyStage::Placed), JourneyStage::Rejected);
    assert_eq!(change.effect, None);

    for to in JourneyStage::ALL {
        if to == JourneyStage::Placed {
            continue;
        }
        assert_eq!(plan_stage_change(Some(JourneyStage::Placed), to).effect, None);
        assert_eq!(plan_stage_change(None, to).effect, None);
    }
}

#[test]
fn schedule_parsing_accepts_both_form_shapes() {
    let rfc3339 = parse_schedule("2026-03-02T14:30:00Z").expect("rfc3339 parses");
    assert_eq!(
        rfc3339,
        Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap()
    );

    let local = parse_schedule("2026-03-02T14:30").expect("datetime-local parses");
    assert_eq!(local, Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap());
}

#[test]
fn unparsable_schedules_mean_no_schedule() {
    assert_eq!(parse_schedule(""), None);
    assert_eq!(parse_schedule("   "), None);
    assert_eq!(parse_schedule("tomorrow"), None);
    assert_eq!(parse_schedule("2026-13-40T99:99"), None);
}
