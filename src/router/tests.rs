use super::*;
use crate::error::RouterError;
use crate::host::{HostCommand, MemoryStackHost, RecordingUrlOpener, StackHost};
use crate::options::{PresentationStyle, RouteOptions, TransitionStyle};
use crate::screen::{
    PlaceholderScreen, RouteCallback, Screen, ScreenFactory, ScreenHandle, ScreenState,
};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

fn router_with_host() -> (Router, Arc<MemoryStackHost>) {
    let router = Router::new();
    let host = Arc::new(MemoryStackHost::new());
    router.attach_stack_host(Arc::clone(&host) as Arc<dyn StackHost>);
    (router, host)
}

fn counting_factory(name: &'static str, built: &Arc<AtomicUsize>) -> ScreenFactory {
    let built = Arc::clone(built);
    ScreenFactory::with_params(move |params| {
        built.fetch_add(1, Ordering::SeqCst);
        Arc::new(PlaceholderScreen::new(name, params.clone())) as ScreenHandle
    })
}

#[test]
fn test_open_passes_params_to_factory() {
    let (router, host) = router_with_host();
    router
        .map(
            "users/:user_id/posts/:id",
            PlaceholderScreen::factory("post"),
            RouteOptions::new(),
        )
        .unwrap();

    let opened = router.open("users/3/posts/9", true).unwrap();
    let screen = opened.screen().unwrap();
    let post = screen.downcast_ref::<PlaceholderScreen>().unwrap();
    assert_eq!(post.params().get("user_id"), Some("3"));
    assert_eq!(post.params().get("id"), Some("9"));
    assert_eq!(host.stack_titles(), vec!["post"]);
}

#[test]
fn test_parameterless_factory() {
    let (router, host) = router_with_host();
    router
        .map(
            "about",
            ScreenFactory::new(|| {
                Arc::new(PlaceholderScreen::new("about", RouteParams::new())) as ScreenHandle
            }),
            RouteOptions::new(),
        )
        .unwrap();
    router.open("about", false).unwrap();
    assert_eq!(host.journal().len(), 1);
}

#[test]
fn test_shared_route_reuses_until_unload() {
    let (router, _host) = router_with_host();
    let built = Arc::new(AtomicUsize::new(0));
    router
        .map(
            "inbox",
            counting_factory("inbox", &built),
            RouteOptions::new().shared(),
        )
        .unwrap();

    let first = router.screen_for_path("inbox").unwrap();
    let second = router.screen_for_path("inbox").unwrap();
    assert_eq!(first.id(), second.id());
    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert_eq!(router.shared_screens(), vec!["inbox"]);

    first.unload();
    assert!(router.shared_screens().is_empty());
    let third = router.screen_for_path("inbox").unwrap();
    assert_ne!(third.id(), first.id());
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[test]
fn test_non_shared_route_builds_fresh() {
    let (router, _host) = router_with_host();
    let built = Arc::new(AtomicUsize::new(0));
    router
        .map(
            "feed",
            counting_factory("feed", &built),
            RouteOptions::new(),
        )
        .unwrap();
    let a = router.screen_for_path("feed").unwrap();
    let b = router.screen_for_path("feed").unwrap();
    assert_ne!(a.id(), b.id());
    assert!(router.shared_screens().is_empty());
}

#[test]
fn test_shared_cache_keyed_by_path() {
    let (router, _host) = router_with_host();
    router
        .map(
            "users/:id",
            PlaceholderScreen::factory("user"),
            RouteOptions::new().shared(),
        )
        .unwrap();
    let one = router.screen_for_path("users/1").unwrap();
    let two = router.screen_for_path("users/2").unwrap();
    assert_ne!(one.id(), two.id());
    assert_eq!(router.shared_screens(), vec!["users/1", "users/2"]);
}

#[test]
fn test_factory_returning_unloaded_instance_is_not_cached() {
    let (router, _host) = router_with_host();
    let fixed: ScreenHandle = Arc::new(PlaceholderScreen::new("inbox", RouteParams::new()));
    let handle = Arc::clone(&fixed);
    router
        .map(
            "inbox",
            ScreenFactory::new(move || Arc::clone(&handle)),
            RouteOptions::new().shared(),
        )
        .unwrap();

    router.screen_for_path("inbox").unwrap().unload();
    assert!(router.shared_screens().is_empty());

    let again = router.screen_for_path("inbox").unwrap();
    assert_eq!(again.id(), fixed.id());
    assert!(router.shared_screens().is_empty());
    assert!(router.shared_screen("inbox").is_none());
}

struct EvictionWitness {
    state: ScreenState,
    router: Weak<Router>,
    seen: Arc<Mutex<Option<Vec<String>>>>,
}

impl Screen for EvictionWitness {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn did_unload(&self) {
        if let Some(router) = self.router.upgrade() {
            *self.seen.lock() = Some(router.shared_screens());
        }
    }
}

#[test]
fn test_shared_entry_evicted_before_own_teardown_runs() {
    let router = Arc::new(Router::new());
    let seen = Arc::new(Mutex::new(None));
    let weak = Arc::downgrade(&router);
    let s = Arc::clone(&seen);
    router
        .map(
            "inbox",
            ScreenFactory::new(move || {
                Arc::new(EvictionWitness {
                    state: ScreenState::new(),
                    router: Weak::clone(&weak),
                    seen: Arc::clone(&s),
                }) as ScreenHandle
            }),
            RouteOptions::new().shared(),
        )
        .unwrap();

    let screen = router.screen_for_path("inbox").unwrap();
    assert_eq!(router.shared_screens(), vec!["inbox"]);
    screen.unload();
    assert_eq!(*seen.lock(), Some(Vec::new()));
}

#[test]
fn test_reopening_shared_screen_pops_back() {
    let (router, host) = router_with_host();
    router
        .map(
            "inbox",
            PlaceholderScreen::factory("inbox"),
            RouteOptions::new().shared(),
        )
        .unwrap();
    router
        .map(
            "message/:id",
            PlaceholderScreen::factory("message"),
            RouteOptions::new(),
        )
        .unwrap();

    router.open("inbox", false).unwrap();
    router.open("message/1", true).unwrap();
    let opened = router.open("inbox", true).unwrap();

    match opened {
        Opened::Navigated { plan, .. } => {
            assert_eq!(plan.action, StackAction::PopTo { animated: true });
        }
        other => panic!("expected navigation, got {other:?}"),
    }
    assert_eq!(host.stack_titles(), vec!["inbox"]);
}

#[test]
fn test_resets_leaves_single_screen() {
    let (router, host) = router_with_host();
    router
        .map("a", PlaceholderScreen::factory("a"), RouteOptions::new())
        .unwrap();
    router
        .map("b", PlaceholderScreen::factory("b"), RouteOptions::new())
        .unwrap();
    router
        .map(
            "home",
            PlaceholderScreen::factory("home"),
            RouteOptions::new().resets(),
        )
        .unwrap();

    router.open("a", false).unwrap();
    router.open("b", false).unwrap();
    router.open("home", true).unwrap();
    assert_eq!(host.stack_titles(), vec!["home"]);
}

#[test]
fn test_modal_route_applies_styles_to_wrapper() {
    let (router, host) = router_with_host();
    router
        .map(
            "login",
            PlaceholderScreen::factory("login"),
            RouteOptions::new()
                .modal()
                .transition("flip")
                .presentation("form_sheet"),
        )
        .unwrap();

    let opened = router.open("login", true).unwrap();
    let screen = opened.screen().unwrap();
    assert_eq!(
        screen.state().transition_style(),
        Some(TransitionStyle::Flip)
    );

    let presented = host.presented().unwrap();
    assert!(presented.is_navigation_container());
    assert_eq!(
        presented.state().transition_style(),
        Some(TransitionStyle::Flip)
    );
    assert_eq!(
        presented.state().presentation_style(),
        Some(PresentationStyle::FormSheet)
    );
    assert_eq!(host.stack_len(), 0);
}

#[test]
fn test_modal_container_presented_directly() {
    let (router, host) = router_with_host();
    router
        .map(
            "compose",
            ScreenFactory::new(|| {
                Arc::new(PlaceholderScreen::container("compose")) as ScreenHandle
            }),
            RouteOptions::new().modal(),
        )
        .unwrap();
    router.open("compose", true).unwrap();
    assert!(!host
        .journal()
        .iter()
        .any(|c| matches!(c, HostCommand::Wrap { .. })));
    assert_eq!(host.presented().unwrap().title(), "compose");
}

#[test]
fn test_configurator_runs_before_navigation() {
    let (router, host) = router_with_host();
    router
        .map(
            "login",
            PlaceholderScreen::factory("login"),
            RouteOptions::new().modal(),
        )
        .unwrap();
    router
        .open_with("login", true, |screen| {
            assert!(host.journal().is_empty());
            screen
                .state()
                .set_presentation_style(Some(PresentationStyle::PageSheet));
        })
        .unwrap();
    assert_eq!(
        host.presented().unwrap().state().presentation_style(),
        Some(PresentationStyle::PageSheet)
    );
}

#[test]
fn test_callback_routes_skip_the_stack() {
    let (router, host) = router_with_host();
    let zero_hits = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(None));

    let z = Arc::clone(&zero_hits);
    router
        .map_callback(
            "logout",
            RouteCallback::new(move || {
                z.fetch_add(1, Ordering::SeqCst);
            }),
            RouteOptions::new(),
        )
        .unwrap();
    let s = Arc::clone(&seen);
    router
        .map_callback(
            "logout/:id",
            RouteCallback::with_params(move |params| {
                *s.lock() = params.get("id").map(str::to_string);
            }),
            RouteOptions::new(),
        )
        .unwrap();

    assert!(matches!(router.open("logout", true).unwrap(), Opened::Callback { arity: 0 }));
    assert!(matches!(router.open("logout/123", true).unwrap(), Opened::Callback { arity: 1 }));
    assert_eq!(zero_hits.load(Ordering::SeqCst), 1);
    assert_eq!(seen.lock().as_deref(), Some("123"));
    assert!(host.journal().is_empty());
}

#[test]
fn test_callback_takes_precedence_over_factory() {
    let (router, host) = router_with_host();
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    router
        .define(
            "both",
            Some(PlaceholderScreen::factory("both")),
            &RouteOptions::new(),
            Some(RouteCallback::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            })),
        )
        .unwrap();
    router.open("both", true).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(host.stack_len(), 0);
}

#[test]
fn test_callback_runs_without_host() {
    let router = Router::new();
    router
        .map_callback("ping", RouteCallback::new(|| {}), RouteOptions::new())
        .unwrap();
    assert!(router.open("ping", true).is_ok());
}

#[test]
fn test_open_without_host_is_detached() {
    let router = Router::new();
    router
        .map("a", PlaceholderScreen::factory("a"), RouteOptions::new())
        .unwrap();
    let err = router.open("a", true).unwrap_err();
    assert!(matches!(err, RouterError::Detached { collaborator: "stack host" }));
}

#[test]
fn test_detach_and_reattach() {
    let (router, first) = router_with_host();
    router
        .map("a", PlaceholderScreen::factory("a"), RouteOptions::new())
        .unwrap();
    assert!(router.detach_stack_host().is_some());
    assert!(router.stack_host().is_none());

    let second = Arc::new(MemoryStackHost::new());
    router.attach_stack_host(Arc::clone(&second) as Arc<dyn StackHost>);
    router.open("a", true).unwrap();
    assert_eq!(first.stack_len(), 0);
    assert_eq!(second.stack_len(), 1);
}

#[test]
fn test_factory_error_propagates() {
    let (router, host) = router_with_host();
    router
        .map(
            "broken",
            ScreenFactory::try_with_params(|_| anyhow::bail!("storyboard missing")),
            RouteOptions::new(),
        )
        .unwrap();
    let err = router.open("broken", true).unwrap_err();
    assert!(matches!(err, RouterError::Screen(_)));
    assert!(err.to_string().contains("storyboard missing"));
    assert!(host.journal().is_empty());
}

#[test]
fn test_route_without_target_fails_at_open() {
    let (router, _host) = router_with_host();
    router
        .define("empty", None, &RouteOptions::new(), None)
        .unwrap();
    assert!(matches!(
        router.open("empty", true).unwrap_err(),
        RouterError::Screen(_)
    ));
}

#[test]
fn test_invalid_option_leaves_routes_unchanged() {
    let router = Router::new();
    router
        .map("a", PlaceholderScreen::factory("a"), RouteOptions::new())
        .unwrap();
    let err = router
        .map(
            "b",
            PlaceholderScreen::factory("b"),
            RouteOptions::new().transition("bogus"),
        )
        .unwrap_err();
    assert!(err.is_invalid_option());
    assert_eq!(router.templates(), vec!["a"]);
}

#[test]
fn test_not_found_then_mapped() {
    let (router, _host) = router_with_host();
    assert!(router.open("settings", true).unwrap_err().is_not_found());
    router
        .map(
            "settings",
            PlaceholderScreen::factory("settings"),
            RouteOptions::new(),
        )
        .unwrap();
    assert!(router.open("settings", true).is_ok());
}

#[test]
fn test_options_for_path() {
    let router = Router::new();
    router
        .map(
            "login",
            PlaceholderScreen::factory("login"),
            RouteOptions::new().modal().transition("curl"),
        )
        .unwrap();
    let d = router.options_for_path("login").unwrap();
    assert!(d.modal);
    assert_eq!(d.transition, Some(TransitionStyle::Curl));
    assert_eq!(router.resolution_cache_len(), 1);
}

#[test]
fn test_remap_keeps_stale_resolution_until_cleared() {
    let router = Router::new();
    router
        .map(
            "page",
            PlaceholderScreen::factory("old"),
            RouteOptions::new(),
        )
        .unwrap();
    assert!(!router.options_for_path("page").unwrap().modal);

    router
        .map(
            "page",
            PlaceholderScreen::factory("new"),
            RouteOptions::new().modal(),
        )
        .unwrap();
    assert!(!router.options_for_path("page").unwrap().modal);

    router.clear_resolution_cache();
    assert!(router.options_for_path("page").unwrap().modal);
}

#[test]
fn test_pop_dismisses_then_pops() {
    let (router, host) = router_with_host();
    router
        .map("a", PlaceholderScreen::factory("a"), RouteOptions::new())
        .unwrap();
    router
        .map(
            "m",
            PlaceholderScreen::factory("m"),
            RouteOptions::new().modal(),
        )
        .unwrap();
    router.open("a", false).unwrap();
    router.open("m", true).unwrap();

    assert_eq!(router.pop(true).unwrap(), PopOutcome::DismissedModal);
    assert_eq!(router.pop(false).unwrap(), PopOutcome::PoppedScreen);
    assert_eq!(host.stack_len(), 0);
}

#[test]
fn test_open_external() {
    let router = Router::new();
    assert!(matches!(
        router.open_external("http://google.com").unwrap_err(),
        RouterError::Detached { collaborator: "url opener" }
    ));

    let opener = Arc::new(RecordingUrlOpener::new());
    router.set_url_opener(Some(Arc::clone(&opener) as Arc<dyn crate::host::UrlOpener>));
    router.open_external("http://google.com").unwrap();
    assert_eq!(opener.opened().len(), 1);

    let err = router.open_external("not a url").unwrap_err();
    assert!(matches!(err, RouterError::InvalidUrl { .. }));
    assert_eq!(opener.opened().len(), 1);
}

#[test]
fn test_many_routes_resolve_to_the_right_one() {
    let router = Router::new();
    for i in 0..500 {
        let template = format!("api/resource{i}/:id");
        router
            .map(
                &template,
                PlaceholderScreen::factory(template.clone()),
                RouteOptions::new(),
            )
            .unwrap();
    }
    let resolved = router.resolve("api/resource250/123").unwrap();
    assert_eq!(resolved.template(), "api/resource250/:id");
    assert_eq!(resolved.params.get("id"), Some("123"));
    assert!(router.resolve("api/resource500/1").unwrap_err().is_not_found());
}

#[test]
fn test_default_router_install_and_take() {
    let router = Arc::new(Router::new());
    install_default(Arc::clone(&router));
    let current = default_router().unwrap();
    assert!(Arc::ptr_eq(&current, &router));
    let taken = take_default().unwrap();
    assert!(Arc::ptr_eq(&taken, &router));
    assert!(default_router().is_none());
}
