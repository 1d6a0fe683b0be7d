#![allow(
    clippy::expect_used,
    clippy::float_cmp,
    clippy::unwrap_used,
    clippy::panic,
    reason = "tests"
)]

use std::sync::Arc;

use super::*;
use crate::config::MapperConfig;
use crate::error::{Error, ErrorKind, ReportExt};
use crate::fixtures::*;
use crate::reflect::Mappable;
use crate::shape::{CapabilityKind, Shape, ShapeRegistry};
use crate::value::ValueError;

fn build_plan<I: Mappable, O: Mappable>(registry: &ShapeRegistry) -> crate::Result<MappingPlan> {
    PlanBuilder::new(registry, &MapperConfig::default()).build(
        TypeRef::of::<I>(),
        TypeRef::of::<O>(),
        None,
    )
}

fn operation<'p>(plan: &'p PairPlan, destination: &str) -> &'p OperationKind {
    &plan
        .operations
        .iter()
        .find(|operation| operation.destination == destination)
        .unwrap_or_else(|| panic!("no operation writes `{destination}`"))
        .kind
}

#[test]
fn test_classifier_requires_identical_declared_types() {
    assert!(is_symmetric(&Person::describe(), &PersonRecord::describe()));
    assert!(!is_symmetric(&PersonRecord::describe(), &Person::describe()));
    assert!(!is_symmetric(&Origin::describe(), &Destination::describe()));
}

#[test]
fn test_symmetric_plan_copies_in_input_order() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<Person, PersonRecord>(&registry).unwrap();
    let root = plan.root();

    assert_eq!(root.strategy, Strategy::Symmetric);
    let order: Vec<_> = root.operations.iter().map(|op| op.source).collect();
    assert_eq!(
        order,
        vec!["name", "age", "tags", "scores", "nickname", "address"]
    );
    assert_eq!(operation(root, "age"), &OperationKind::DirectAssign);
    assert_eq!(operation(root, "address"), &OperationKind::DirectAssign);
    assert_eq!(
        operation(root, "tags"),
        &OperationKind::CollectionCopy {
            element: Box::new(OperationKind::DirectAssign),
        }
    );
    assert_eq!(
        operation(root, "scores"),
        &OperationKind::ArrayCopy {
            element: Box::new(OperationKind::DirectAssign),
        }
    );
}

#[test]
fn test_asymmetric_plan_recurses_into_nested_pair() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<Origin, Destination>(&registry).unwrap();
    let root = plan.root();

    assert_eq!(root.strategy, Strategy::Asymmetric);
    assert_eq!(operation(root, "Name"), &OperationKind::DirectAssign);
    let OperationKind::NestedComplex { plan: nested } = operation(root, "Child") else {
        panic!("Child should map through a nested plan");
    };
    let nested = plan.plan(*nested).unwrap();
    assert_eq!(nested.input, TypeRef::of::<OriginChild>());
    assert_eq!(nested.output, TypeRef::of::<DestinationChild>());
    assert_eq!(
        operation(nested, "Number"),
        &OperationKind::NumericCast {
            target: PrimitiveKind::I64,
        }
    );
}

#[test]
fn test_asymmetric_plan_skips_missing_source_properties() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<Tree, TreeRow>(&registry).unwrap();

    let destinations: Vec<_> = plan
        .root()
        .operations
        .iter()
        .map(|op| op.destination)
        .collect();
    assert_eq!(destinations, vec!["name", "children"]);
}

#[test]
fn test_enum_operations() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<Tagged, TaggedRow>(&registry).unwrap();
    let root = plan.root();

    assert_eq!(
        operation(root, "Value"),
        &OperationKind::EnumUnderlyingCast {
            underlying: PrimitiveKind::I32,
            target:     PrimitiveKind::I32,
        }
    );
    assert_eq!(operation(root, "Label"), &OperationKind::StringCoerce);
    assert!(matches!(
        operation(root, "Mirror"),
        OperationKind::EnumCast { variants, .. } if variants.len() == 2
    ));
}

#[test]
fn test_primitives_and_names_plan_into_enums() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<TaggedRow, Tagged>(&registry).unwrap();
    let root = plan.root();

    assert!(matches!(
        operation(root, "Value"),
        OperationKind::EnumFromPrimitive { target, underlying: PrimitiveKind::I32, variants }
            if *target == TypeRef::of::<Kind>() && variants.len() == 2
    ));
    assert!(matches!(
        operation(root, "Label"),
        OperationKind::EnumParse { target, .. } if *target == TypeRef::of::<Kind>()
    ));
    assert!(matches!(
        operation(root, "Mirror"),
        OperationKind::EnumCast { target, .. } if *target == TypeRef::of::<Kind>()
    ));
}

#[test]
fn test_enum_values_are_rebuilt_from_row() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<TaggedRow, Tagged>(&registry).unwrap();
    let mut tagged = Tagged::default();

    plan.execute(
        &TaggedRow {
            value:  2,
            label:  "Second".to_string(),
            mirror: MirrorKind::Second,
        },
        &mut tagged,
    )
    .unwrap();

    assert_eq!(
        tagged,
        Tagged {
            value:  Kind::Second,
            label:  Kind::Second,
            mirror: Kind::Second,
        }
    );
}

#[test]
fn test_enum_values_outside_the_variants_fail() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<TaggedRow, Tagged>(&registry).unwrap();

    let report = plan
        .execute(
            &TaggedRow {
                value: 7,
                ..TaggedRow::default()
            },
            &mut Tagged::default(),
        )
        .unwrap_err();
    assert_eq!(
        report.current_context(),
        &ValueError::UnknownDiscriminant {
            type_name:    TypeRef::of::<Kind>().name(),
            discriminant: 7,
        }
    );

    let report = plan
        .execute(
            &TaggedRow {
                value: 1,
                label: "Third".to_string(),
                ..TaggedRow::default()
            },
            &mut Tagged::default(),
        )
        .unwrap_err();
    assert_eq!(
        report.current_context(),
        &ValueError::UnknownVariant {
            type_name: TypeRef::of::<Kind>().name(),
            variant:   "Third".to_string(),
        }
    );
}

#[test]
fn test_enum_cast_requires_every_source_discriminant() {
    let registry = ShapeRegistry::new();
    let report = build_plan::<Tagged, NarrowTagged>(&registry).unwrap_err();

    assert_eq!(report.current_context().kind(), ErrorKind::PlanGeneration);
    assert!(report.contains_kind(ErrorKind::Unconvertible));
}

#[test]
fn test_collection_elements_are_planned() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<Listing, ListingRow>(&registry).unwrap();
    let root = plan.root();

    assert_eq!(
        operation(root, "Value2"),
        &OperationKind::CollectionCopy {
            element: Box::new(OperationKind::DirectAssign),
        }
    );
    assert_eq!(
        operation(root, "counts"),
        &OperationKind::CollectionCopy {
            element: Box::new(OperationKind::NumericCast {
                target: PrimitiveKind::F64,
            }),
        }
    );
}

#[test]
fn test_complex_elements_always_use_nested_plans() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<WithChildren, WithChildren>(&registry).unwrap();

    let OperationKind::CollectionCopy { element } = operation(plan.root(), "children") else {
        panic!("children should be copied element-wise");
    };
    let OperationKind::NestedComplex { plan: nested } = element.as_ref() else {
        panic!("complex elements should map through a nested plan");
    };
    assert_eq!(
        plan.plan(*nested).unwrap().input,
        TypeRef::of::<OriginChild>()
    );
}

#[test]
fn test_arrays_of_structs_use_nested_plans() {
    let registry = ShapeRegistry::new();

    for plan in [
        build_plan::<WithChildArray, WithChildArrayRow>(&registry).unwrap(),
        build_plan::<WithChildSlice, WithChildArrayRow>(&registry).unwrap(),
    ] {
        let OperationKind::ArrayCopy { element } = operation(plan.root(), "children") else {
            panic!("children should be copied element-wise");
        };
        let OperationKind::NestedComplex { plan: nested } = element.as_ref() else {
            panic!("struct elements should map through a nested plan");
        };
        let nested = plan.plan(*nested).unwrap();
        assert_eq!(nested.input, TypeRef::of::<OriginChild>());
        assert_eq!(nested.output, TypeRef::of::<DestinationChild>());
    }
}

#[test]
fn test_array_to_scalar_is_structural_mismatch() {
    let registry = ShapeRegistry::new();
    let report = build_plan::<WithArray, WithScalar>(&registry).unwrap_err();

    assert!(matches!(
        report.current_context(),
        Error::PlanGeneration { property, .. } if property == "values"
    ));
    assert!(matches!(
        report.root_error(),
        Some(Error::StructuralMismatch { property, source_element, destination_element, .. })
            if property == "values" && source_element == "i32" && destination_element == "i32"
    ));
}

#[test]
fn test_fixed_arrays_must_agree_on_length() {
    let registry = ShapeRegistry::new();
    let report = build_plan::<WithArray, WithLongerArray>(&registry).unwrap_err();
    assert!(report.contains_kind(ErrorKind::StructuralMismatch));

    assert!(build_plan::<WithSlice, WithArray>(&registry).is_ok());
}

#[test]
fn test_cyclic_types_reuse_the_pair_in_progress() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<Tree, TreeRow>(&registry).unwrap();

    assert_eq!(plan.plans().len(), 1);
    assert_eq!(
        operation(plan.root(), "children"),
        &OperationKind::CollectionCopy {
            element: Box::new(OperationKind::NestedComplex {
                plan: plan.root_index(),
            }),
        }
    );

    let plan = build_plan::<Chain, ChainRow>(&registry).unwrap();
    assert_eq!(
        operation(plan.root(), "next"),
        &OperationKind::OptionMap {
            inner: Box::new(OperationKind::NestedComplex {
                plan: plan.root_index(),
            }),
        }
    );
}

#[test]
fn test_optional_rules() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<Measured, MeasuredRow>(&registry).unwrap();
    let root = plan.root();

    assert_eq!(
        operation(root, "reading"),
        &OperationKind::WrapSome {
            inner: Box::new(OperationKind::NumericCast {
                target: PrimitiveKind::F64,
            }),
        }
    );
    assert_eq!(
        operation(root, "note"),
        &OperationKind::OptionMap {
            inner: Box::new(OperationKind::NumericCast {
                target: PrimitiveKind::U32,
            }),
        }
    );

    let report = build_plan::<Measured, MeasuredStrict>(&registry).unwrap_err();
    assert!(report.contains_kind(ErrorKind::Unconvertible));
}

#[test]
fn test_optional_values_are_wrapped() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<Measured, MeasuredRow>(&registry).unwrap();

    let mut row = MeasuredRow::default();
    plan.execute(
        &Measured {
            reading: 1.5,
            note:    Some(7),
        },
        &mut row,
    )
    .unwrap();
    assert_eq!(row.reading, Some(1.5));
    assert_eq!(row.note, Some(7));

    let mut row = MeasuredRow::default();
    plan.execute(&Measured::default(), &mut row).unwrap();
    assert_eq!(row.reading, Some(0.0));
    assert_eq!(row.note, None);
}

#[test]
fn test_scalar_to_struct_is_unconvertible() {
    let registry = ShapeRegistry::new();
    let report = build_plan::<Plain, Structured>(&registry).unwrap_err();

    assert_eq!(
        report.error_kinds(),
        vec![ErrorKind::PlanGeneration, ErrorKind::Unconvertible]
    );
}

#[test]
fn test_guard_rejects_in_both_strategies() {
    let registry = ShapeRegistry::new();

    let symmetric = build_plan::<Connection, ConnectionMirror>(&registry).unwrap_err();
    assert!(matches!(
        symmetric.root_error(),
        Some(Error::ForbiddenCapability {
            capability: CapabilityKind::NetworkSocket,
            property,
            ..
        }) if property == "socket"
    ));

    let asymmetric = build_plan::<Connection, ConnectionRow>(&registry).unwrap_err();
    assert!(asymmetric.contains_kind(ErrorKind::ForbiddenCapability));

    let custom = build_plan::<Repository, RepositoryRow>(&registry).unwrap_err();
    assert!(matches!(
        custom.root_error(),
        Some(Error::ForbiddenCapability {
            capability: CapabilityKind::DatabaseConnection,
            ..
        })
    ));

    let foreign = build_plan::<Native, NativeRow>(&registry).unwrap_err();
    assert!(matches!(
        foreign.root_error(),
        Some(Error::ForbiddenCapability {
            capability: CapabilityKind::ForeignObject,
            ..
        })
    ));
}

#[test]
fn test_guard_checks_destination_property() {
    let registry = ShapeRegistry::new();
    let report = build_plan::<ConnectionRow, Connection>(&registry).unwrap_err();

    assert!(matches!(
        report.root_error(),
        Some(Error::ForbiddenCapability { property, .. }) if property == "socket"
    ));
}

#[test]
fn test_guard_ignores_properties_without_counterpart() {
    let registry = ShapeRegistry::new();
    assert!(build_plan::<Connection, ConnectionSummary>(&registry).is_ok());
}

#[test]
fn test_guard_walks_wrappers() {
    let registry = ShapeRegistry::new();
    let guard = CapabilityGuard::new(&registry);

    assert_eq!(
        guard.capability_of(&TypeRef::of::<Option<Arc<std::net::TcpStream>>>()),
        Some(CapabilityKind::NetworkSocket)
    );
    assert_eq!(
        guard.capability_of(&TypeRef::of::<Vec<std::fs::File>>()),
        Some(CapabilityKind::FileSystem)
    );
    assert_eq!(
        guard.capability_of(&TypeRef::of::<Box<[std::io::Stdin; 1]>>()),
        Some(CapabilityKind::IoStream)
    );
    assert_eq!(guard.capability_of(&TypeRef::of::<Vec<Address>>()), None);
}

#[test]
fn test_guard_walks_nested_struct_properties() {
    let registry = ShapeRegistry::new();
    let guard = CapabilityGuard::new(&registry);

    assert_eq!(
        guard.capability_of(&TypeRef::of::<Pool>()),
        Some(CapabilityKind::NetworkSocket)
    );
    assert_eq!(guard.capability_of(&TypeRef::of::<Tree>()), None);
    assert_eq!(guard.capability_of(&TypeRef::of::<Chain>()), None);

    let report = build_plan::<Pool, PoolRow>(&registry).unwrap_err();
    assert!(matches!(
        report.root_error(),
        Some(Error::ForbiddenCapability {
            capability: CapabilityKind::NetworkSocket,
            property,
            ..
        }) if property == "connection"
    ));
}

#[test]
fn test_recursion_limit() {
    let registry = ShapeRegistry::new();
    let config = MapperConfig::default().with_max_depth(0);
    let report = PlanBuilder::new(&registry, &config)
        .build(
            TypeRef::of::<Origin>(),
            TypeRef::of::<Destination>(),
            None,
        )
        .unwrap_err();

    assert!(matches!(
        report.root_error(),
        Some(Error::RecursionLimitExceeded { limit: 0, .. })
    ));

    // a pair already in progress is reused before the depth is checked
    let config = MapperConfig::default().with_max_depth(0);
    assert!(
        PlanBuilder::new(&registry, &config)
            .build(TypeRef::of::<Tree>(), TypeRef::of::<TreeRow>(), None)
            .is_ok()
    );
}

#[test]
fn test_reversed_symmetric_plan_swaps_roles() {
    let registry = ShapeRegistry::new();
    let forward = build_plan::<Person, PersonRecord>(&registry).unwrap();
    let construct = Person::describe().constructor().unwrap();
    let reverse = forward.reversed(construct);

    assert_eq!(reverse.root().input, TypeRef::of::<PersonRecord>());
    assert_eq!(reverse.root().output, TypeRef::of::<Person>());
    assert_eq!(reverse.root().operations.len(), 6);
    assert_eq!(reverse.strategy(), Strategy::Symmetric);
}

#[test]
fn test_plan_serializes_for_debugging() {
    let registry = ShapeRegistry::new();
    let plan = build_plan::<Origin, Destination>(&registry).unwrap();
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["plans"][0]["strategy"], "Asymmetric");
    assert_eq!(json["plans"][0]["operations"][1]["kind"]["op"], "nested_complex");
    assert_eq!(json["plans"][1]["operations"][0]["kind"]["target"], "i64");
}
