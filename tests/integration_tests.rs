use qtrace::{q_with, Body, Callable, Config, Kw, Logger, Signature};
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

// A logger writing uncolored entries to its own temp file
struct QLog {
    _dir: TempDir,
    path: PathBuf,
    logger: Arc<Logger>,
}

fn setup() -> QLog {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("q");
    let logger = Arc::new(Logger::new(Config {
        output_path: path.clone(),
        color: false,
        ..Config::default()
    }));
    QLog {
        _dir: dir,
        path,
        logger,
    }
}

fn read_log(q: &QLog) -> String {
    fs::read_to_string(&q.path).expect("Log file should exist")
}

// Each part must appear in the log, in order, possibly across lines
fn assert_in_log(q: &QLog, parts: &[&str]) {
    let logdata = read_log(q);
    let pattern = parts
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join(".*");
    let expected = Regex::new(&format!("(?s){}", pattern)).unwrap();
    assert!(
        expected.is_match(&logdata),
        "Regexp didn't match: {:?} not found in\n{}\n{}\n{}",
        pattern,
        "-".repeat(75),
        logdata,
        "-".repeat(75)
    );
}

fn opaque_wrapper<G, A, R>(func: Callable<G>) -> Callable<impl Fn(A) -> R>
where
    G: Body<A, Output = R>,
{
    Callable::new(Signature::function("do_nothing"), move |args: A| {
        func.call(args)
    })
}

fn preserving_wrapper<G, A, R>(func: Callable<G>) -> Callable<impl Fn(A) -> R>
where
    G: Body<A, Output = R>,
{
    let signature = Signature::wrapper("do_nothing", func.signature());
    Callable::new(signature, move |args: A| func.call(args))
}

struct A {
    attrib1: &'static str,
    attrib2: &'static str,
}

impl A {
    fn new(logger: &Logger, two: &'static str, three: &'static str, four: &'static str) -> A {
        q_with!(logger; two, three, four);
        A {
            attrib1: "Attrib1",
            attrib2: "Attrib2",
        }
    }

    fn attributes(&self, logger: &Logger) {
        q_with!(logger; self.attrib1, self.attrib2);
    }

    fn attributes_and_arguments(&self, logger: &Logger, two: &str, three: &str, four: &str) {
        q_with!(logger; two, three, self.attrib1, four, self.attrib2);
    }

    fn multiple_calls_on_line(&self, logger: &Logger, two: &str, three: &str, four: &str) -> String {
        q_with!(logger; format!("{}{}", q_with!(logger; two, self.attrib1).0, q_with!(logger; three, self.attrib2).0), four).0
    }
}

macro_rules! show {
    ($logger:expr, $e:expr) => {
        q_with!($logger; $e, 1)
    };
}

#[rustfmt::skip]
fn user_macro_beside_direct_call(logger: &Logger) {
    let (a, b, x) = (9, 1, 9);
    q_with!(logger; a, b); show!(logger, x);
}

fn renamed_receiver(s: &A, logger: &Logger) {
    q_with!(logger; s.attrib1, s.attrib2);
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn test_log_message() {
        let q = setup();
        let out = q_with!(q.logger; "Test message");
        assert_eq!(out, "Test message");
        assert_in_log(&q, &["Test message"]);
    }

    #[test]
    fn test_argument_order_arguments() {
        let q = setup();
        A::new(&q.logger, "ArgVal1", "ArgVal2", "ArgVal3");
        assert_in_log(
            &q,
            &[
                "A::new:",
                r#"two="ArgVal1""#,
                r#"three="ArgVal2""#,
                r#"four="ArgVal3""#,
            ],
        );
    }

    #[test]
    fn test_argument_order_attributes() {
        let q = setup();
        let a = A::new(&q.logger, "ArgVal1", "ArgVal2", "ArgVal3");
        a.attributes(&q.logger);
        assert_in_log(
            &q,
            &[
                "A::attributes:",
                r#"self.attrib1="Attrib1","#,
                r#"self.attrib2="Attrib2""#,
            ],
        );
    }

    #[test]
    fn test_argument_order_renamed_receiver() {
        let q = setup();
        let a = A::new(&q.logger, "ArgVal1", "ArgVal2", "ArgVal3");
        renamed_receiver(&a, &q.logger);
        assert_in_log(
            &q,
            &[
                "renamed_receiver:",
                r#"s.attrib1="Attrib1","#,
                r#"s.attrib2="Attrib2""#,
            ],
        );
    }

    #[test]
    fn test_multiple_calls_on_line() {
        let q = setup();
        let a = A::new(&q.logger, "ArgVal1", "ArgVal2", "ArgVal3");
        let joined = a.multiple_calls_on_line(&q.logger, "ArgVal1", "ArgVal2", "ArgVal3");
        assert_eq!(joined, "ArgVal1ArgVal2");
        assert_in_log(
            &q,
            &[
                "multiple_calls_on_line:",
                r#"two="ArgVal1","#,
                r#"self.attrib1="Attrib1""#,
                "multiple_calls_on_line:",
                r#"three="ArgVal2","#,
                r#"self.attrib2="Attrib2""#,
                "multiple_calls_on_line:",
                r#"="ArgVal1ArgVal2","#,
                r#"four="ArgVal3""#,
            ],
        );
    }

    #[test]
    fn test_user_macro_keeps_its_own_labels() {
        let q = setup();
        user_macro_beside_direct_call(&q.logger);
        let logdata = read_log(&q);
        let lines: Vec<&str> = logdata.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("user_macro_beside_direct_call: a=9, b=1"), "{}", lines[0]);
        assert!(lines[1].ends_with("user_macro_beside_direct_call: x=9, 1"), "{}", lines[1]);
    }

    #[test]
    fn test_argument_order_attributes_and_arguments() {
        let q = setup();
        let a = A::new(&q.logger, "ArgVal1", "ArgVal2", "ArgVal3");
        a.attributes_and_arguments(&q.logger, "ArgVal1", "ArgVal2", "ArgVal3");
        assert_in_log(
            &q,
            &[
                "attributes_and_arguments:",
                r#"two="ArgVal1""#,
                r#"three="ArgVal2""#,
                r#"self.attrib1="Attrib1""#,
                r#"four="ArgVal3""#,
                r#"self.attrib2="Attrib2""#,
            ],
        );
    }

    #[test]
    fn test_passthrough_keeps_values() {
        #[derive(Debug, PartialEq)]
        struct Custom {
            id: u32,
        }

        let q = setup();
        assert_eq!(q_with!(q.logger; None::<u8>), None);
        assert_eq!(q_with!(q.logger; vec![1, 2, 3]), vec![1, 2, 3]);
        assert_eq!(q_with!(q.logger; Custom { id: 7 }), Custom { id: 7 });

        let total = q_with!(q.logger; 2 + 3) * 10;
        assert_eq!(total, 50);
        let (x, y, z) = q_with!(q.logger; 1, "b", 'c');
        assert_eq!((x, y, z), (1, "b", 'c'));
        assert_in_log(&q, &["None", "vec![1, 2, 3]=[1, 2, 3]", "Custom { id: 7 }", "2 + 3=5"]);
    }

    #[test]
    fn test_arguments_evaluated_once() {
        let q = setup();
        let mut calls = 0;
        let mut bump = || {
            calls += 1;
            calls
        };
        let got = q_with!(q.logger; bump());
        assert_eq!(got, 1);
        assert_eq!(calls, 1);
        assert_in_log(&q, &["bump()=1"]);
    }

    #[test]
    fn test_multiline_call() {
        let q = setup();
        let first = 1;
        let second = 2;
        let (a, b) = q_with!(
            q.logger;
            first,
            second + 1,
        );
        assert_eq!((a, b), (1, 3));
        assert_in_log(&q, &["first=1, second + 1=3"]);
    }

    #[test]
    fn test_same_value_logged_twice_renders_identically() {
        let q = setup();
        for _ in 0..2 {
            q_with!(q.logger; [0.5f32, 1.5]);
        }
        let logdata = read_log(&q);
        let bodies: Vec<&str> = logdata
            .lines()
            .map(|l| l.split_once("test_same_value_logged_twice_renders_identically:").unwrap().1)
            .collect();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[0], " [0.5f32, 1.5]=[0.5, 1.5]");
    }

    #[test]
    fn test_concurrent_entries_stay_whole() {
        let q = setup();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let logger = Arc::clone(&q.logger);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        q_with!(logger; t, i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let logdata = read_log(&q);
        assert_eq!(logdata.lines().count(), 100);
        assert!(logdata.lines().all(|l| l.contains(": t=") && l.contains(", i=")));
    }
}

#[cfg(test)]
mod trace_tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};

    #[test]
    fn test_function_call() {
        let q = setup();
        let test = q.logger.trace(Callable::new(
            Signature::function("test").with_params(&["arg"]),
            |(_arg,): (&str,)| "RetVal",
        ));

        assert_eq!(test.call(("ArgVal",)), "RetVal");
        assert_in_log(&q, &["ArgVal"]);
        assert_in_log(&q, &["RetVal"]);
    }

    #[test]
    fn test_trace() {
        let q = setup();
        let log1 = qtrace::trace_with(
            &q.logger,
            Callable::new(
                Signature::function("log1").with_params(&["msg"]),
                |(msg,): (&str,)| msg.to_string(),
            ),
        );
        let log2 = q.logger.trace(Callable::new(
            Signature::function("log2").with_params(&["msg"]),
            |(msg,): (&str,)| msg.to_string(),
        ));

        assert_eq!(log1.call(("log1 message",)), "log1 message");
        assert_eq!(log2.call(("log2 message",)), "log2 message");
        assert_in_log(&q, &[r#"log1(msg="log1 message")"#]);
        assert_in_log(&q, &[r#"-> "log1 message""#]);
        assert_in_log(&q, &[r#"log2(msg="log2 message")"#]);
    }

    #[test]
    fn test_keyword_and_extra_arguments() {
        let q = setup();
        let join = q.logger.trace(Callable::new(
            Signature::function("join").with_params(&["left"]),
            |(left, right, sep): (&str, &str, Kw<&str>)| format!("{left}{}{right}", *sep),
        ));

        assert_eq!(join.call(("a", "b", Kw::new("sep", "-"))), "a-b");
        assert_in_log(&q, &[r#"join(left="a", "b", sep="-")"#, r#"-> "a-b""#]);
    }

    #[test]
    fn test_nested_bad_wrapper() {
        let q = setup();
        let decorated_log_bad = opaque_wrapper(q.logger.trace(opaque_wrapper(Callable::new(
            Signature::function("decorated_log_bad").with_params(&["msg"]),
            |(msg,): (&str,)| msg.to_string(),
        ))));

        decorated_log_bad.call(("decorated bad message",));
        assert_in_log(&q, &[r#"do_nothing("decorated bad message")"#]);
        assert_in_log(&q, &[r#"-> "decorated bad message""#]);
    }

    #[test]
    fn test_nested_good_wrappers() {
        let q = setup();
        let decorated_log_good = preserving_wrapper(q.logger.trace(preserving_wrapper(
            Callable::new(
                Signature::function("decorated_log_good").with_params(&["msg"]),
                |(msg,): (&str,)| msg.to_string(),
            ),
        )));

        decorated_log_good.call(("decorated good message",));
        assert_in_log(&q, &[r#"decorated_log_good(msg="decorated good message")"#]);
        assert_in_log(&q, &[r#"-> "decorated good message""#]);
        assert!(!read_log(&q).contains("do_nothing("));
    }

    #[test]
    fn test_trace_method() {
        let q = setup();
        let a = A {
            attrib1: "Attrib1",
            attrib2: "Attrib2",
        };

        let run1 = q.logger.trace(Callable::new(
            Signature::method("A", "run1").with_params(&["arg"]),
            |_this: &A, (arg,): (&str,)| arg.to_string(),
        ));
        let run2 = q.logger.trace(Callable::new(
            Signature::static_method("A", "run2").with_params(&["arg"]),
            |(arg,): (&str,)| arg.to_string(),
        ));
        let run3 = q.logger.trace(Callable::new(
            Signature::class_method("A", "run3").with_params(&["arg"]),
            |(arg,): (&str,)| arg.to_string(),
        ));

        run1.call_on(&a, ("first message",));
        run2.call(("second message",));
        run3.call(("third message",));

        assert_in_log(&q, &["A::run1(", r#"arg="first message")"#]);
        assert_in_log(&q, &[r#"-> "first message""#]);
        assert_in_log(&q, &["A::run2(", r#"arg="second message")"#]);
        assert_in_log(&q, &[r#"-> "second message""#]);
        assert_in_log(&q, &["A::run3(", r#"arg="third message")"#]);
        assert_in_log(&q, &[r#"-> "third message""#]);
    }

    #[test]
    fn test_recursive_calls_each_get_an_entry_pair() {
        let q = setup();
        fn fact(n: u64) -> u64 {
            if n == 0 {
                1
            } else {
                n * fact(n - 1)
            }
        }
        let traced = q.logger.trace(Callable::new(
            Signature::function("fact").with_params(&["n"]),
            |(n,): (u64,)| fact(n),
        ));
        assert_eq!(traced.call((5,)), 120);
        assert_eq!(traced.call((3,)), 6);
        assert_in_log(&q, &["fact(n=5)", "-> 120", "fact(n=3)", "-> 6"]);
    }

    #[test]
    fn test_failure_propagates_without_exit_entry() {
        let q = setup();
        let boom = q.logger.trace(Callable::new(
            Signature::function("boom").with_params(&["n"]),
            |(n,): (u32,)| -> u32 {
                if n > 0 {
                    panic!("boom {}", n);
                }
                n
            },
        ));

        let err = panic::catch_unwind(AssertUnwindSafe(|| boom.call((7,)))).unwrap_err();
        assert_eq!(err.downcast_ref::<String>().map(String::as_str), Some("boom 7"));
        assert_in_log(&q, &["boom(n=7)"]);
        assert!(!read_log(&q).contains("->"));
    }

    #[test]
    fn test_err_results_are_return_values() {
        let q = setup();
        let parse = q.logger.trace(Callable::new(
            Signature::function("parse").with_params(&["text"]),
            |(text,): (&str,)| text.parse::<u8>().map_err(|_| "bad"),
        ));

        assert_eq!(parse.call(("x",)), Err("bad"));
        assert_in_log(&q, &[r#"parse(text="x")"#, r#"-> Err("bad")"#]);
    }
}
