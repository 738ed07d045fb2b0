#![no_main]

use ferrous_resolver::{
    implements, ConstructionError, Constructor, DiError, DuplicatePolicy, Injectable, Lifetime,
    Resolver, ResolverOptions,
};
use libfuzzer_sys::fuzz_target;
use std::rc::Rc;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let policy = match data[0] % 3 {
        0 => DuplicatePolicy::KeepFirst,
        1 => DuplicatePolicy::Replace,
        _ => DuplicatePolicy::Reject,
    };
    let options = ResolverOptions::new()
        .duplicate_policy(policy)
        .detect_cycles(data[1] % 2 == 0)
        .max_depth(usize::from(data[2]) + 1);
    let mut resolver = Resolver::with_options(options);

    // Each remaining byte registers one binding; the resolver must never panic.
    for byte in &data[3..] {
        let lifetime = match byte % 3 {
            0 => Lifetime::Singleton,
            1 => Lifetime::Scoped,
            _ => Lifetime::Transient,
        };
        let _ = match (byte >> 2) % 5 {
            0 => resolver.bind_singleton::<TestService, _>(TestService { id: u32::from(*byte) }),
            1 => resolver.bind_singleton::<dyn TestTrait, _>(TestServiceImpl { value: i32::from(*byte) }),
            2 => resolver.bind_factory::<ScopedService, _>(
                lifetime,
                Constructor::from_fn(|(svc,): (Rc<TestService>,)| {
                    Ok(ScopedService { data: format!("scoped-{}", svc.id) })
                }),
            ),
            3 => resolver.bind_factory::<Looping, _>(
                lifetime,
                Constructor::from_fn(|(_l,): (Rc<Looping>,)| Ok(Looping)),
            ),
            _ => resolver.bind_transient::<Consumer, Consumer>(),
        };
    }

    let mut scope = resolver.make_scope();
    let outcomes = [
        resolver.resolve::<Consumer>().map(|_| ()),
        resolver.resolve_in::<Consumer>(&mut scope).map(|_| ()),
        resolver.resolve_ephemeral::<Consumer>().map(|_| ()),
        resolver.get::<Looping>().map(|_| ()),
        resolver.get_in::<ScopedService>(&mut scope).map(|_| ()),
    ];
    for outcome in outcomes {
        match outcome {
            Ok(())
            | Err(DiError::DependencyNotFound(_))
            | Err(DiError::MissingScope(_))
            | Err(DiError::Circular(_))
            | Err(DiError::DepthExceeded(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let report = resolver.validate();
    let _ = report.format_issues();
    assert!(resolver.size() <= 5);
});

struct TestService {
    id: u32,
}

struct ScopedService {
    data: String,
}

struct Looping;

trait TestTrait {
    fn get_value(&self) -> i32;
}

struct TestServiceImpl {
    value: i32,
}

impl TestTrait for TestServiceImpl {
    fn get_value(&self) -> i32 {
        self.value
    }
}

implements!(TestServiceImpl => dyn TestTrait);

struct Consumer {
    service: Rc<TestService>,
    scoped: Rc<ScopedService>,
    value: i32,
}

impl Injectable for Consumer {
    type Dependencies = (Rc<TestService>, Rc<ScopedService>, Rc<dyn TestTrait>);

    fn construct((service, scoped, tr): Self::Dependencies) -> Result<Self, ConstructionError> {
        Ok(Consumer {
            service,
            scoped,
            value: tr.get_value(),
        })
    }
}
