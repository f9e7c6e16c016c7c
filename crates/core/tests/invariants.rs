use proptest::prelude::*;
use std::collections::HashSet;
use teamsheet_core::{Lineup, MirrorView, OptionIndex, PickerId};

const VALUES: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

#[derive(Debug, Clone)]
enum Gesture {
    Pick(usize, usize),
    Clear(usize),
    Set(usize, usize),
    Swap(usize, usize),
    Promote(usize, usize),
    Toggle(usize),
}

fn gesture() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        3 => (0..8usize, 0..8usize).prop_map(|(slot, position)| Gesture::Pick(slot, position)),
        2 => (0..8usize).prop_map(Gesture::Clear),
        2 => (0..8usize, 0..9usize).prop_map(|(slot, value)| Gesture::Set(slot, value)),
        1 => (0..8usize, 0..8usize).prop_map(|(a, b)| Gesture::Swap(a, b)),
        1 => (0..8usize, 0..8usize).prop_map(|(a, b)| Gesture::Promote(a, b)),
        1 => (0..8usize).prop_map(Gesture::Toggle),
    ]
}

struct Rig {
    lineup: Lineup<&'static str>,
    mirrors: Vec<MirrorView<&'static str>>,
}

/// Two groups: six players over two starters and three substitutes, and a
/// scarce group of two players over one starter and two substitutes.
fn rig() -> Rig {
    let mut lineup = Lineup::new();
    let mut mirrors = Vec::new();
    let mut ids = Vec::new();
    for label in ["A1", "A2", "A-S1", "A-S2", "A-S3", "B1", "B-S1", "B-S2"] {
        let mirror = MirrorView::new();
        mirrors.push(mirror.clone());
        ids.push(lineup.add_picker(label, Box::new(mirror)));
    }
    lineup
        .initialize_group(&ids[0..5], VALUES[0..6].to_vec())
        .expect("group a");
    lineup
        .initialize_group(&ids[5..8], VALUES[6..8].to_vec())
        .expect("group b");
    lineup.create_sequence(&ids[2..5]).expect("sequence a");
    lineup.create_sequence(&ids[6..8]).expect("sequence b");
    Rig { lineup, mirrors }
}

type Snapshot = Vec<(Vec<OptionIndex>, Option<OptionIndex>, bool)>;

fn snapshot(lineup: &Lineup<&'static str>) -> Snapshot {
    lineup
        .pickers()
        .iter()
        .map(|picker| {
            (
                picker.mask().to_vec(),
                picker.selection_index(),
                picker.is_active(),
            )
        })
        .collect()
}

fn apply(rig: &mut Rig, gesture: &Gesture) -> bool {
    let count = rig.lineup.pickers().len();
    let id = |slot: usize| PickerId(slot % count);
    let result = match *gesture {
        Gesture::Pick(slot, position) => rig.lineup.pick(id(slot), position),
        Gesture::Clear(slot) => rig.lineup.clear_selection(id(slot)),
        Gesture::Set(slot, value) => {
            let value = VALUES.get(value).copied().unwrap_or("nobody");
            rig.lineup.set_selection(id(slot), Some(&value))
        }
        Gesture::Swap(a, b) => rig.lineup.swap(id(a), id(b)),
        Gesture::Promote(a, b) => rig.lineup.promote(id(a), id(b)),
        Gesture::Toggle(slot) => {
            let active = rig
                .lineup
                .picker(id(slot))
                .map(|picker| picker.is_active())
                .unwrap_or(true);
            rig.lineup.set_active(id(slot), !active)
        }
    };
    result.is_ok()
}

fn check_invariants(rig: &Rig) -> Result<(), TestCaseError> {
    let lineup = &rig.lineup;
    let pickers = lineup.pickers();
    for picker in pickers {
        let mask = picker.mask();
        prop_assert!(
            mask.windows(2).all(|pair| pair[0] < pair[1]),
            "mask of {} not in pool order: {:?}",
            picker.label(),
            mask
        );
        if let Some(index) = picker.selection_index() {
            prop_assert!(picker.offers(index), "{} lost its own pick", picker.label());
        }
        let mirror = &rig.mirrors[picker.id().0];
        let offered: Vec<&str> = picker.offered().into_iter().copied().collect();
        prop_assert_eq!(mirror.options(), offered);
        prop_assert_eq!(mirror.selected_value(), picker.selection().copied());
    }

    for group in lineup.groups() {
        let claims = group.claims(pickers);
        let claimed: HashSet<OptionIndex> = claims.iter().map(|(_, index)| *index).collect();
        prop_assert_eq!(claimed.len(), claims.len(), "duplicate claims {:?}", claims);
        for index in 0..group.pool().len() {
            let holder = claims
                .iter()
                .find(|(_, claimed)| *claimed == index)
                .map(|(picker, _)| *picker);
            for member in group.members() {
                let offers = pickers[member.0].offers(index);
                match holder {
                    Some(holder) if holder != *member => prop_assert!(
                        !offers,
                        "option {} held by {} still offered by {}",
                        index,
                        holder,
                        member
                    ),
                    _ => prop_assert!(offers, "option {} missing from {}", index, member),
                }
            }
        }
    }

    for sequence in lineup.sequences() {
        prop_assert!(sequence.is_gap_free(pickers), "gap in {:?}", sequence.id());
    }
    Ok(())
}

proptest! {
    #[test]
    fn gestures_preserve_allocation_invariants(script in prop::collection::vec(gesture(), 0..80)) {
        let mut rig = rig();
        check_invariants(&rig)?;
        for gesture in &script {
            let before = snapshot(&rig.lineup);
            let accepted = apply(&mut rig, gesture);
            if !accepted {
                prop_assert_eq!(&before, &snapshot(&rig.lineup), "rejected {:?} mutated state", gesture);
            }
            check_invariants(&rig)?;
        }
    }

    #[test]
    fn set_then_clear_restores_every_mask(slot in 0..2usize, value in 0..6usize) {
        let mut rig = rig();
        let before = snapshot(&rig.lineup);
        let id = PickerId(slot);
        rig.lineup.set_selection(id, Some(&VALUES[value])).expect("set");
        rig.lineup.set_selection(id, None).expect("clear");
        prop_assert_eq!(before, snapshot(&rig.lineup));
    }
}
