//! End-to-end checks of resolve, path edit, launch and staging working together.

use std::path::PathBuf;
use std::time::Duration;

use launcher::configure::set_path;
use launcher::core::assets::AssetKind;
use launcher::core::types::Readiness;
use launcher::io::process::{LaunchOutcome, launch};
use launcher::io::resolve::resolve;
use launcher::launch::launch_module;
use launcher::stage::Stager;
use launcher::test_support::{catalog_of, descriptor};

#[test]
fn path_edit_then_resolve_reflects_new_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let installed = temp.path().join("Tooth").join("Tooth.exe");
    std::fs::create_dir_all(installed.parent().expect("parent")).expect("mkdir");
    std::fs::write(&installed, b"").expect("write");

    let mut catalog = catalog_of(vec![descriptor("tooth", "/nowhere/Tooth.exe")]);
    assert_eq!(
        resolve(catalog.require("tooth").expect("tooth")),
        Readiness::Missing
    );

    set_path(&mut catalog, "tooth", &installed).expect("set path");
    assert_eq!(
        resolve(catalog.require("tooth").expect("tooth")),
        Readiness::Ready
    );
}

#[test]
fn executable_removed_between_resolve_and_launch_is_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let exe = temp.path().join("Flow.exe");
    std::fs::write(&exe, b"").expect("write");
    let catalog = catalog_of(vec![descriptor("flow", &exe)]);
    assert_eq!(
        resolve(catalog.require("flow").expect("flow")),
        Readiness::Ready
    );

    std::fs::remove_file(&exe).expect("remove");
    assert!(matches!(launch(&exe), LaunchOutcome::NotFound));
    assert!(matches!(
        launch_module(&catalog, "flow").expect("launch"),
        LaunchOutcome::NotFound
    ));
}

#[cfg(unix)]
#[test]
fn same_module_can_be_launched_twice() {
    use launcher::test_support::scratch_module;
    use wait_timeout::ChildExt;

    let (_temp, exe) = scratch_module("Abdomen", "Abdomen.exe", "exit 0\n");
    let catalog = catalog_of(vec![descriptor("abdomen", &exe)]);

    let mut pids = Vec::new();
    for _ in 0..2 {
        match launch_module(&catalog, "abdomen").expect("launch") {
            LaunchOutcome::Success(mut process) => {
                pids.push(process.pid);
                process
                    .child
                    .wait_timeout(Duration::from_secs(10))
                    .expect("wait")
                    .expect("child exited");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }
    assert_ne!(pids[0], pids[1]);
}

#[test]
fn concurrent_staging_runs_finish_independently() {
    let stager = Stager::new(Duration::from_millis(1), PathBuf::from("cache"));
    let mut liver = stager.start("liver").expect("liver");
    let mut heart = stager.start("heart").expect("heart");
    let mut liver_again = stager.start("liver").expect("liver again");

    let runs = [
        (&mut liver, "liver"),
        (&mut heart, "heart"),
        (&mut liver_again, "liver"),
    ];
    for (run, id) in runs {
        let report = run.wait().expect("wait");
        assert_eq!(report.progress, (1..=100).collect::<Vec<u8>>());
        assert_eq!(report.assets.module_id, id);
        for kind in AssetKind::ALL {
            let path = report.assets.get(kind).expect("asset");
            assert!(path.to_string_lossy().contains(id));
        }
    }
}
