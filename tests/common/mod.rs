#![allow(dead_code)]

pub mod temp_files {
    use std::io::Write;

    /// Write `content` to a fresh temp file with the given extension
    pub fn create_temp_manifest(content: &str, ext: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("routable_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn create_temp_yaml(content: &str) -> tempfile::NamedTempFile {
        create_temp_manifest(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> tempfile::NamedTempFile {
        create_temp_manifest(content, "json")
    }
}

pub mod screens {
    use routable::router::RouteParams;
    use routable::screen::{Screen, ScreenFactory, ScreenHandle, ScreenState};
    use std::any::Any;
    use std::borrow::Cow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Screen that counts constructions and its own teardowns
    pub struct TestScreen {
        state: ScreenState,
        name: &'static str,
        pub params: RouteParams,
        unloads: Arc<AtomicUsize>,
    }

    impl Screen for TestScreen {
        fn state(&self) -> &ScreenState {
            &self.state
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn title(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.name)
        }

        fn did_unload(&self) {
            self.unloads.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Counters shared by every screen a [`counted`] factory builds
    #[derive(Default, Clone)]
    pub struct Counters {
        pub built: Arc<AtomicUsize>,
        pub unloads: Arc<AtomicUsize>,
    }

    impl Counters {
        pub fn built(&self) -> usize {
            self.built.load(Ordering::SeqCst)
        }

        pub fn unloads(&self) -> usize {
            self.unloads.load(Ordering::SeqCst)
        }
    }

    /// Factory building [`TestScreen`]s named `name`
    pub fn counted(name: &'static str, counters: &Counters) -> ScreenFactory {
        let counters = counters.clone();
        ScreenFactory::with_params(move |params| {
            counters.built.fetch_add(1, Ordering::SeqCst);
            Arc::new(TestScreen {
                state: ScreenState::new(),
                name,
                params: params.clone(),
                unloads: Arc::clone(&counters.unloads),
            }) as ScreenHandle
        })
    }
}

pub mod harness {
    use routable::host::{MemoryStackHost, StackHost};
    use routable::Router;
    use std::sync::Arc;

    /// A router with a fresh in-memory stack attached
    pub fn attached_router() -> (Router, Arc<MemoryStackHost>) {
        let router = Router::new();
        let host = Arc::new(MemoryStackHost::new());
        router.attach_stack_host(Arc::clone(&host) as Arc<dyn StackHost>);
        (router, host)
    }
}
