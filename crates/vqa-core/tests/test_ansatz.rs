//! Tests for ansatz specifications and circuit templates.

use proptest::prelude::*;
use vqa_core::{Angle, AnsatzKind, AnsatzSpec, CircuitTemplate, Gate, VqaError};

#[test]
fn initial_parameters_reproducible() {
    let spec = AnsatzSpec::hardware_efficient(4, 2).unwrap();
    let a = spec.initial_parameters(42);
    let b = spec.initial_parameters(42);
    assert_eq!(a.len(), 8);
    assert_eq!(
        a.iter().map(|x| x.to_bits()).collect::<Vec<_>>(),
        b.iter().map(|x| x.to_bits()).collect::<Vec<_>>()
    );
    assert_ne!(a, spec.initial_parameters(43));
}

#[test]
fn molecular_initial_range() {
    for spec in [AnsatzSpec::uccsd(), AnsatzSpec::simplified_h2()] {
        let p = spec.initial_parameters(7);
        assert_eq!(p.len(), 1);
        assert!(p[0].abs() <= 0.1);
    }
}

#[test]
fn h2_ansatz_by_name() {
    assert_eq!(AnsatzSpec::for_h2("UCCSD").unwrap().kind(), AnsatzKind::Uccsd);
    assert_eq!(
        AnsatzSpec::for_h2("simplified").unwrap().kind(),
        AnsatzKind::SimplifiedH2
    );
    assert!(matches!(
        AnsatzSpec::for_h2("adapt"),
        Err(VqaError::Configuration(_))
    ));
}

#[test]
fn zero_depth_rejected() {
    assert!(AnsatzSpec::hardware_efficient(3, 0).is_err());
    assert!(AnsatzSpec::hardware_efficient(0, 1).is_err());
}

#[test]
fn bind_checks_length() {
    let template = AnsatzSpec::hardware_efficient(2, 1)
        .unwrap()
        .build_state_preparation()
        .unwrap();
    assert!(matches!(
        template.bind(&[0.1]),
        Err(VqaError::DimensionMismatch {
            expected: 2,
            actual: 1
        })
    ));
    let circuit = template.bind(&[0.1, -0.2]).unwrap();
    assert_eq!(circuit.gates()[1], Gate::Ry(1, -0.2));
}

#[test]
fn negated_slot_binds_negative() {
    let template = AnsatzSpec::simplified_h2().build_state_preparation().unwrap();
    let circuit = template.bind(&[0.3]).unwrap();
    assert!(circuit.gates().contains(&Gate::Ry(0, 0.3)));
    assert!(circuit.gates().contains(&Gate::Ry(2, -0.3)));
}

#[test]
fn template_rejects_out_of_range_gate() {
    let mut template = CircuitTemplate::new(2);
    assert!(matches!(
        template.ry(2, Angle::Param(0)),
        Err(VqaError::QubitOutOfRange { qubit: 2, .. })
    ));
    assert!(template.cx(0, 5).is_err());
}

fn arb_spec() -> impl Strategy<Value = AnsatzSpec> {
    prop_oneof![
        (1_usize..=6, 1_usize..=4)
            .prop_map(|(n, d)| AnsatzSpec::hardware_efficient(n, d).unwrap()),
        Just(AnsatzSpec::uccsd()),
        Just(AnsatzSpec::simplified_h2()),
    ]
}

proptest! {
    #[test]
    fn parameter_count_matches_template(spec in arb_spec()) {
        let template = spec.build_state_preparation().unwrap();
        prop_assert_eq!(spec.parameter_count(), template.num_parameters());
        prop_assert_eq!(template.num_qubits(), spec.num_qubits());
    }

    #[test]
    fn initial_parameters_deterministic(spec in arb_spec(), seed in any::<u64>()) {
        let a = spec.initial_parameters(seed);
        let b = spec.initial_parameters(seed);
        prop_assert_eq!(a.len(), spec.parameter_count());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn hardware_efficient_within_pi(n in 1_usize..=5, depth in 1_usize..=3, seed in any::<u64>()) {
        let spec = AnsatzSpec::hardware_efficient(n, depth).unwrap();
        for p in spec.initial_parameters(seed) {
            prop_assert!(p.abs() <= std::f64::consts::PI);
        }
    }
}
