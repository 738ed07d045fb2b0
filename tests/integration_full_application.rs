/// Full application integration tests
///
/// These tests wire a small request-handling application through the
/// resolver to check the lifetimes working together end to end.

use ferrous_resolver::{
    implements, ConstructionError, Constructor, DuplicatePolicy, Injectable, Lifetime, Resolver,
    ResolverOptions,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// ===== Application Domain Models =====

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub cache_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/testdb".to_string(),
            cache_size: 1000,
        }
    }
}

// ===== Logging Infrastructure =====

pub trait Logger {
    fn log(&self, message: &str);
    fn lines(&self) -> Vec<String>;
}

#[derive(Default)]
pub struct InMemoryLogger {
    lines: RefCell<Vec<String>>,
}

impl Logger for InMemoryLogger {
    fn log(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }

    fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

implements!(InMemoryLogger => dyn Logger);

// ===== Data Access =====

pub trait Database {
    fn query(&self, sql: &str) -> String;
}

pub struct PostgresDatabase {
    url: String,
    logger: Rc<dyn Logger>,
}

impl Database for PostgresDatabase {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("query: {sql}"));
        format!("{} <- {}", self.url, sql)
    }
}

impl Injectable for PostgresDatabase {
    type Dependencies = (Rc<AppConfig>, Rc<dyn Logger>);

    fn construct((config, logger): Self::Dependencies) -> Result<Self, ConstructionError> {
        if config.database_url.is_empty() {
            return Err("database url is empty".into());
        }
        logger.log("database connected");
        Ok(PostgresDatabase {
            url: config.database_url.clone(),
            logger,
        })
    }
}

implements!(PostgresDatabase => dyn Database);

// ===== Request Handling =====

pub struct RequestContext {
    pub request_id: u32,
    pub user: RefCell<Option<String>>,
}

pub struct UserRepository {
    db: Rc<dyn Database>,
    ctx: Rc<RequestContext>,
}

impl Injectable for UserRepository {
    type Dependencies = (Rc<dyn Database>, Rc<RequestContext>);

    fn construct((db, ctx): Self::Dependencies) -> Result<Self, ConstructionError> {
        Ok(UserRepository { db, ctx })
    }
}

impl UserRepository {
    fn find(&self, name: &str) -> String {
        *self.ctx.user.borrow_mut() = Some(name.to_string());
        self.db.query(&format!("select * from users where name = '{name}'"))
    }
}

pub struct UserController {
    repository: Rc<UserRepository>,
    ctx: Rc<RequestContext>,
    logger: Rc<dyn Logger>,
}

impl Injectable for UserController {
    type Dependencies = (Rc<UserRepository>, Rc<RequestContext>, Rc<dyn Logger>);

    fn construct((repository, ctx, logger): Self::Dependencies) -> Result<Self, ConstructionError> {
        Ok(UserController { repository, ctx, logger })
    }
}

impl UserController {
    fn handle(&self, name: &str) -> String {
        self.logger.log(&format!("request {}", self.ctx.request_id));
        self.repository.find(name)
    }
}

fn build_app(logger: Rc<InMemoryLogger>) -> Resolver {
    let next_request = Rc::new(Cell::new(0));

    let mut resolver =
        Resolver::with_options(ResolverOptions::new().duplicate_policy(DuplicatePolicy::Reject));
    resolver
        .bind_singleton::<AppConfig, _>(AppConfig::default())
        .unwrap()
        .bind_instance::<dyn Logger>(logger)
        .unwrap()
        .bind_singleton_eager::<dyn Database, PostgresDatabase>()
        .unwrap()
        .bind_factory::<RequestContext, _>(
            Lifetime::Scoped,
            Constructor::from_fn(move |()| {
                next_request.set(next_request.get() + 1);
                Ok(RequestContext {
                    request_id: next_request.get(),
                    user: RefCell::new(None),
                })
            }),
        )
        .unwrap()
        .bind_scoped::<UserRepository, UserRepository>()
        .unwrap();
    resolver
}

#[test]
fn test_application_wiring_is_valid() {
    let resolver = build_app(Rc::new(InMemoryLogger::default()));
    let report = resolver.validate();

    assert!(report.is_valid(), "{}", report.format_issues());
    assert!(!report.has_warnings());
    assert_eq!(resolver.size(), 5);
}

#[test]
fn test_request_flow() {
    let logger = Rc::new(InMemoryLogger::default());
    let resolver = build_app(logger.clone());

    let mut request = resolver.make_scope();
    let controller = resolver.resolve_in::<UserController>(&mut request).unwrap();
    let result = controller.handle("alice");

    assert!(result.starts_with("postgres://localhost/testdb"));
    assert!(Rc::ptr_eq(&controller.ctx, &controller.repository.ctx));
    assert_eq!(controller.ctx.user.borrow().as_deref(), Some("alice"));
    assert_eq!(
        logger.lines(),
        vec![
            "database connected".to_string(),
            "request 1".to_string(),
            "query: select * from users where name = 'alice'".to_string(),
        ]
    );
}

#[test]
fn test_requests_are_isolated() {
    let resolver = build_app(Rc::new(InMemoryLogger::default()));

    let mut first = resolver.make_scope();
    let mut second = resolver.make_scope();
    let a = resolver.resolve_in::<UserController>(&mut first).unwrap();
    let b = resolver.resolve_in::<UserController>(&mut second).unwrap();

    a.handle("alice");
    assert_eq!(a.ctx.request_id, 1);
    assert_eq!(b.ctx.request_id, 2);
    assert!(b.ctx.user.borrow().is_none());
    assert!(Rc::ptr_eq(&a.repository.db, &b.repository.db));
}

#[test]
fn test_reject_policy_guards_wiring() {
    let mut resolver = build_app(Rc::new(InMemoryLogger::default()));
    assert!(resolver.bind_singleton::<AppConfig, _>(AppConfig::default()).is_err());
}

#[test]
fn test_database_construction_failure() {
    let mut resolver = Resolver::new();
    resolver
        .bind_singleton::<AppConfig, _>(AppConfig {
            database_url: String::new(),
            cache_size: 0,
        })
        .unwrap()
        .bind_instance::<dyn Logger>(Rc::new(InMemoryLogger::default()))
        .unwrap();

    let err = resolver
        .bind_singleton_eager::<dyn Database, PostgresDatabase>()
        .err()
        .unwrap();
    assert!(err.to_string().contains("database url is empty"));
    assert!(!resolver.contains::<dyn Database>());
}
