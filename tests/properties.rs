#![cfg(test)]

mod utils;

use std::thread;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use symkey::{
    model::CompilationBuilder, Compilation, KeyResult, Location, Resolution, Resolved, Resolver,
    SymbolKey,
};
use utils::{handles, sample, sample_with};

#[test]
fn anonymous_property_order_is_significant() {
    let names = ["A", "B", "C", "D", "E"];
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..16 {
        let mut shuffled = names.to_vec();
        shuffled.shuffle(&mut rng);

        let mut b = CompilationBuilder::new();
        let types = vec![b.int(); names.len()];
        let flags = vec![false; names.len()];
        let locations = vec![Location::None; names.len()];
        let ordered = b
            .anonymous(
                &types,
                &names.iter().map(|n| n.to_string()).collect::<Vec<_>>(),
                &flags,
                &locations,
            )
            .unwrap();
        let permuted = b
            .anonymous(
                &types,
                &shuffled.iter().map(|n| n.to_string()).collect::<Vec<_>>(),
                &flags,
                &locations,
            )
            .unwrap();
        let c = b.finish();

        let ordered_key = SymbolKey::create(&c, &ordered);
        let permuted_key = SymbolKey::create(&c, &permuted);
        if shuffled == names {
            assert_eq!(ordered, permuted);
            assert_eq!(ordered_key, permuted_key);
            continue;
        }

        assert_ne!(ordered, permuted);
        assert_ne!(ordered_key, permuted_key);
        assert_ne!(ordered_key.fingerprint(), permuted_key.fingerprint());
        assert_eq!(
            permuted_key.resolve(&c).unwrap(),
            Ok(Resolution::Symbol(permuted))
        );
        let member_names = c
            .members(&permuted)
            .iter()
            .map(|m| c.name(m))
            .collect::<Vec<_>>();
        assert_eq!(member_names, shuffled);
    }
}

#[test]
fn read_only_flags_distinguish_anonymous_types() {
    let mut b = CompilationBuilder::new();
    let names = vec!["X".to_string(), "Y".to_string()];
    let types = [b.int(), b.string()];
    let locations = [Location::None, Location::None];
    let mutable = b.anonymous(&types, &names, &[false, false], &locations).unwrap();
    let frozen = b.anonymous(&types, &names, &[true, false], &locations).unwrap();
    let c = b.finish();

    assert_ne!(mutable, frozen);
    for symbol in [mutable, frozen].iter() {
        let key = SymbolKey::create(&c, symbol);
        assert_eq!(key.resolve(&c).unwrap(), Ok(Resolution::Symbol(*symbol)));
    }
}

#[test]
fn anonymous_type_resolves_with_its_properties() {
    let s = sample();
    let key = SymbolKey::create(&s.compilation, &s.anon);
    let target = sample_with(5, true);
    let anon = key
        .resolve(&target.compilation)
        .unwrap()
        .unwrap()
        .any_symbol()
        .cloned()
        .unwrap();

    let c = &target.compilation;
    let properties = c.members(&anon);
    let shape = properties
        .iter()
        .map(|p| {
            (
                c.name(p),
                c.type_of(p).map(|t| c.name(&t)),
                c.is_read_only(p),
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(
        shape,
        vec![
            ("X".to_string(), Some("int".to_string()), false),
            ("Y".to_string(), Some("string".to_string()), false),
        ]
    );
    assert_eq!(c.first_location(&properties[0]), utils::at(10, 9));
}

#[test]
fn concurrent_resolutions_agree() {
    let source = sample();
    let target = sample_with(2, true);
    let keys = handles(&source)
        .iter()
        .map(|symbol| SymbolKey::create(&source.compilation, symbol))
        .collect::<Vec<_>>();
    let expected = handles(&target)
        .into_iter()
        .map(|symbol| Ok(Ok(Resolution::Symbol(symbol))))
        .collect::<Vec<KeyResult<Resolved<_>>>>();

    let (compilation, keys) = (&target.compilation, &keys);
    thread::scope(|scope| {
        let workers = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    let resolver = Resolver::new(compilation);
                    let resolved = (0..8)
                        .map(|_| resolver.resolve_all(keys))
                        .collect::<Vec<_>>();
                    assert_eq!(resolver.arena().outstanding(), 0);
                    resolved
                })
            })
            .collect::<Vec<_>>();

        for worker in workers {
            for resolved in worker.join().unwrap() {
                assert_eq!(resolved, expected);
            }
        }
    });
}

#[test]
fn fingerprints_survive_serialization() {
    let s = sample();
    for symbol in handles(&s) {
        let key = SymbolKey::create(&s.compilation, &symbol);
        let copy = SymbolKey::from_bytes(&key.to_bytes().unwrap()).unwrap();
        assert_eq!(key.fingerprint(), copy.fingerprint());
        assert!(key.equivalent(&copy, false));
    }
}
