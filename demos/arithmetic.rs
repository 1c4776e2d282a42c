//! A small arithmetic suite exercising every registration feature.
//!
//! ```text
//! cargo run --example arithmetic
//! VERDICT_LOG=verdict=debug cargo run --example arithmetic
//! ```

use std::process::ExitCode;

use verdict::{
    Argument, ConfigError, MarkerOptions, TestConfig, TestSuite, each, expect, skip_now,
};

const DEBUG: bool = false;

fn add(a: i64, b: i64) -> i64 {
    a + b
}

fn build() -> Result<TestSuite, ConfigError> {
    let mut suite = TestSuite::new("arithmetic");

    suite
        .test(TestConfig::new().comment("async test example").launch_count(2))
        .add_async("add_one_async", |arg: Argument| async move {
            let a: i64 = arg.arg(0).unwrap_or(2);
            tokio::task::yield_now().await;
            expect(add(1, a), a + 1, "1 + 2 should be equal to 3")?;
            Ok::<_, anyhow::Error>(a + 1)
        })?;

    suite
        .test(
            TestConfig::new()
                .comment("adds {b} to each argument")
                .comment_arg("b", 2)
                .tags(["assert"])
                .arguments(each([2, 3])),
        )
        .add("add_two", |arg| {
            let a: i64 = arg.arg(0).unwrap_or_default();
            assert_eq!(add(a, 2), a + 2);
            Ok(a + 2)
        })?;

    suite.test(TestConfig::new()).add("wrong_sum", |_| {
        expect(add(1, 2), 4, "1 + 2 should be equal to 3")?;
        Ok(4)
    })?;
    suite.skip("wrong_sum", MarkerOptions::default());

    suite.skip("debug_only", MarkerOptions::new().reason("not completed").when(DEBUG));
    suite.test(TestConfig::new()).add("debug_only", |_| {
        expect(add(10, 2), 12, "10 + 2 should be equal to 12")?;
        Ok(12)
    })?;

    suite
        .test(
            TestConfig::new()
                .comment("keyword a = {a}")
                .comment_arg("a", 2)
                .tags(["assert"])
                .arguments([Argument::new().with_keyword("a", 2)]),
        )
        .add("off_by_one", |arg| {
            let a: i64 = arg.kwarg("a").unwrap_or(2);
            assert_eq!(add(1, a), a + 2);
            Ok(a + 1)
        })?;
    suite.expectfail("off_by_one", "each dont work");

    suite.test(TestConfig::new().tags(["assert"])).add("large_sum", |_| {
        assert_eq!(add(20, 40), 60);
        Ok(60)
    })?;

    suite.test(TestConfig::new()).add("needs_network", |_| -> anyhow::Result<()> {
        if std::env::var_os("VERDICT_NETWORK").is_none() {
            return Err(skip_now("VERDICT_NETWORK is not set").into());
        }
        Ok(())
    })?;

    Ok(suite)
}

fn main() -> ExitCode {
    match build() {
        Ok(suite) => suite.main(),
        Err(e) => {
            eprintln!("invalid suite: {e}");
            ExitCode::FAILURE
        }
    }
}
