use runpoint::{Capturer, NativeHost, PCounter};
use std::sync::Once;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

struct Probe;

// Helpers use the captured handle before returning it so the capture is
// never a tail call, and their bodies differ so none are merged.

impl Probe {
    #[inline(never)]
    fn locate(&self) -> PCounter {
        let here = runpoint::pc(0);
        assert!(here.len() <= runpoint::depth_limit());
        here
    }
}

#[inline(never)]
fn nested() -> PCounter {
    let here = runpoint::pc(0);
    assert!(!here.is_empty());
    here
}

#[inline(never)]
fn nested_skipping_itself() -> PCounter {
    let here = runpoint::pc(1);
    assert!(!here.is_empty());
    here
}

#[inline(never)]
fn two_layers_down(skip: usize) -> PCounter {
    let here = one_layer_down(skip);
    assert!(!here.is_empty());
    here
}

#[inline(never)]
fn one_layer_down(skip: usize) -> PCounter {
    let here = runpoint::pc(skip);
    assert!(!here.is_empty());
    here
}

#[inline(never)]
fn name_of_caller() -> String {
    let name = runpoint::function();
    assert!(!name.is_empty());
    name
}

#[test]
fn pc_reports_the_calling_function() {
    init_tracing();
    let here = runpoint::pc(0);

    assert_eq!(here.function(), "pc_reports_the_calling_function");
    assert_eq!(here.package(), "native");
    assert_eq!(here.filename(), "native.rs");
    assert!(here.file().ends_with("native.rs"), "file = {:?}", here.file());
    assert!(here.dir().ends_with("tests"), "dir = {:?}", here.dir());
    assert!(here.line() > 0);
}

#[test]
fn free_functions_describe_their_caller() {
    init_tracing();
    let (line, expected) = (runpoint::line(), line!());
    assert_eq!(line, expected);

    assert_eq!(runpoint::function(), "free_functions_describe_their_caller");
    assert_eq!(runpoint::package(), "native");
    assert_eq!(runpoint::pack_full(), "native");
    assert_eq!(runpoint::receiver(), "");
    assert_eq!(runpoint::func_long(), "free_functions_describe_their_caller");
    assert_eq!(
        runpoint::func_full(),
        "native::free_functions_describe_their_caller"
    );
    assert_eq!(runpoint::filename(), "native.rs");
    assert!(runpoint::file().ends_with("native.rs"));
    assert!(runpoint::dir().ends_with("tests"));
}

#[test]
fn caller_zero_is_the_current_function() {
    let frame = runpoint::caller(0);
    assert_eq!(frame.function(), "caller_zero_is_the_current_function");
    assert!(frame.is_resolved());
}

#[test]
fn methods_report_their_receiver() {
    let here = Probe.locate();
    assert_eq!(here.receiver(), "Probe");
    assert_eq!(here.function(), "locate");
    assert_eq!(here.func_long(), "Probe::locate");
    assert_eq!(here.package_path(), "native");
}

#[test]
fn closures_keep_the_enclosing_function_name() {
    let capture = || {
        let here = runpoint::pc(0);
        assert!(here.len() > 1);
        here
    };
    let here = capture();

    assert_eq!(here.function(), "closures_keep_the_enclosing_function_name");
    assert!(
        here.func_long()
            .starts_with("closures_keep_the_enclosing_function_name::{"),
        "func_long = {:?}",
        here.func_long()
    );
}

#[test]
fn walk_goes_outward_from_the_capture_site() {
    let here = nested();

    let mut names = Vec::new();
    let visited = here.walk_frames(|frame| names.push(frame.function().to_owned()));

    assert_eq!(visited, here.len());
    assert_eq!(names[0], "nested");
    assert_eq!(names[1], "walk_goes_outward_from_the_capture_site");
    assert_eq!(here.function(), "nested");
}

#[test]
fn skip_starts_further_out() {
    let here = nested_skipping_itself();
    assert_eq!(here.function(), "skip_starts_further_out");
}

#[test]
fn skip_counts_each_calling_frame() {
    init_tracing();
    assert_eq!(two_layers_down(0).function(), "one_layer_down");
    assert_eq!(two_layers_down(1).function(), "two_layers_down");
    assert_eq!(
        two_layers_down(2).function(),
        "skip_counts_each_calling_frame"
    );
}

#[test]
fn one_shot_queries_report_the_function_that_called_them() {
    assert_eq!(name_of_caller(), "name_of_caller");
}

#[test]
fn capturer_honors_its_depth_limit() {
    let capturer = Capturer::<NativeHost>::default();
    assert_eq!(capturer.set_depth_limit(2), 32);

    let here = capturer.capture(0);
    assert_eq!(here.len(), 2);
    assert_eq!(here.function(), "capturer_honors_its_depth_limit");
}

#[test]
fn zero_depth_limit_fails_fast() {
    let before = runpoint::depth_limit();
    assert!(std::panic::catch_unwind(|| runpoint::set_depth_limit(0)).is_err());
    assert_eq!(runpoint::depth_limit(), before);
}

#[test]
fn first_frame_is_shared_across_threads() {
    let here = nested();
    let names: Vec<String> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| here.function().to_owned()))
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("worker panicked"))
            .collect()
    });
    assert!(names.iter().all(|name| name == "nested"));
}
