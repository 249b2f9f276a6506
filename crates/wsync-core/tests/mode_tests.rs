//! Non-repository sync modes and the other verbs

mod common;

use common::{ENGINE_VERSION, FakeDispatch, FakeEngine, Fixture, PROJECT_VERSION};
use pretty_assertions::assert_eq;
use wsync_core::{
    BranchType, CleanTarget, Error, SyncMode, SyncRequest, VersionBump, VersionQuery,
};

#[test]
fn engineversion_picks_newest_matching_base() {
    let mut fixture = Fixture::new("dev", "dev");
    fixture.engine.versions = vec![
        "4.27-PB-100".into(),
        "4.27-PB-140".into(),
        "5.1-PB-3".into(),
    ];
    let request = SyncRequest {
        repository: Some("gs://bucket/engine".into()),
        ..SyncRequest::new(SyncMode::EngineVersion)
    };
    fixture.workspace().sync(&request).unwrap();

    assert!(fixture.journal.contains("engine.available_versions gs://bucket/engine"));
    assert_eq!(
        fixture.workspace().files().engine_association().unwrap().as_deref(),
        Some("4.27-PB-140")
    );
}

#[test]
fn engineversion_without_repository_fails() {
    let fixture = Fixture::new("dev", "dev");
    assert!(matches!(
        fixture.workspace().sync(&SyncRequest::new(SyncMode::EngineVersion)),
        Err(Error::RepositoryUrlMissing)
    ));
}

#[test]
fn engineversion_with_no_match_fails() {
    let mut fixture = Fixture::new("dev", "dev");
    fixture.config.engine.repository = Some("gs://bucket/engine".into());
    fixture.engine.versions = vec!["5.1-PB-3".into()];
    assert!(matches!(
        fixture.workspace().sync(&SyncRequest::new(SyncMode::EngineVersion)),
        Err(Error::LatestEngineVersionMissing { .. })
    ));
    assert_eq!(
        fixture.workspace().files().engine_association().unwrap().as_deref(),
        Some(ENGINE_VERSION)
    );
}

#[test]
fn binaries_mode_forces_pull() {
    let fixture = Fixture::new("feature", "dev");
    fixture
        .workspace()
        .sync(&SyncRequest::new(SyncMode::Binaries))
        .unwrap();
    assert!(fixture.journal.contains(&format!("binaries.pull {PROJECT_VERSION} force=true")));
    assert!(!fixture.journal.contains("vcs.remote_status"));
}

#[test]
fn binaries_mode_fails_on_nonzero_result() {
    let mut fixture = Fixture::new("dev", "dev");
    fixture.binaries.code = -1;
    assert!(matches!(
        fixture.workspace().sync(&SyncRequest::new(SyncMode::Binaries)),
        Err(Error::BinariesPullFailed { .. })
    ));
}

#[test]
fn engine_mode_in_ci_keeps_three_newest() {
    let mut fixture = Fixture::new("dev", "dev");
    fixture.runtime.is_ci = true;
    fixture.engine = FakeEngine::new(fixture.journal.clone()).with_installed(&[
        "engine-1",
        "engine-2",
        "engine-3",
        "engine-4",
        "engine-5",
        "editor-1",
    ]);
    fixture
        .workspace()
        .sync(&SyncRequest::new(SyncMode::Engine))
        .unwrap();

    assert!(fixture.journal.contains("engine.register engine symbols=false"));
    assert_eq!(
        fixture.engine.installed_names(),
        vec!["engine-3", "engine-4", "engine-5", "editor-1"]
    );
}

#[test]
fn engine_mode_outside_ci_keeps_everything() {
    let fixture = Fixture::new("dev", "dev");
    let request = SyncRequest {
        bundle: Some("editor-symbols".into()),
        ..SyncRequest::new(SyncMode::Engine)
    };
    fixture.workspace().sync(&request).unwrap();
    assert!(fixture.journal.contains("engine.register editor-symbols symbols=false"));
    assert!(!fixture.journal.contains_prefix("engine.remove"));
}

#[test]
fn ddc_mode_uses_declared_engine() {
    let fixture = Fixture::new("dev", "dev");
    fixture.workspace().sync(&SyncRequest::new(SyncMode::Ddc)).unwrap();
    assert!(fixture.journal.contains(&format!("engine.ddc Project.uproject {ENGINE_VERSION}")));
}

#[test]
fn version_queries() {
    let mut fixture = Fixture::new("dev", "dev");
    fixture.engine.versions = vec!["4.27-PB-150".into()];
    let workspace = fixture.workspace();

    assert_eq!(
        workspace.query_version(VersionQuery::CurrentEngine, None).unwrap(),
        ENGINE_VERSION
    );
    assert_eq!(
        workspace.query_version(VersionQuery::Project, None).unwrap(),
        PROJECT_VERSION
    );
    assert_eq!(
        workspace
            .query_version(VersionQuery::LatestEngine, Some("gs://bucket/engine"))
            .unwrap(),
        "4.27-PB-150"
    );
}

#[test]
fn autoversion_bumps_ini() {
    let fixture = Fixture::new("dev", "dev");
    assert_eq!(fixture.workspace().bump_version(VersionBump::Stable).unwrap(), "1.6.0");
    assert_eq!(
        fixture.workspace().query_version(VersionQuery::Project, None).unwrap(),
        "1.6.0"
    );
}

#[test]
fn clean_workspace_resets_current_branch() {
    let fixture = Fixture::new("feature", "dev");
    fixture.workspace().clean(CleanTarget::Workspace).unwrap();

    let close = fixture.journal.position("editor.close_all").unwrap();
    let reset = fixture.journal.position("vcs.reset_to_remote feature").unwrap();
    assert!(close < reset);
}

#[test]
fn clean_engine_failure_is_an_error() {
    let mut fixture = Fixture::new("dev", "dev");
    let mut engine = FakeEngine::new(fixture.journal.clone())
        .with_installed(&["editor-4.26-PB-1", &format!("editor-{ENGINE_VERSION}")]);
    engine.remove_fails = true;
    fixture.engine = engine;

    assert!(matches!(
        fixture.workspace().clean(CleanTarget::Engine),
        Err(Error::EngineCleanup { .. })
    ));
}

fn publishing_fixture() -> Fixture {
    let mut fixture = Fixture::new("dev", "dev");
    fixture.user.dispatch.app_id = Some("480".into());
    fixture.user.dispatch.internal_bid = Some("9001".into());
    let drm = fixture.root().join(&fixture.config.dispatch.drm);
    std::fs::create_dir_all(&drm).unwrap();
    std::fs::write(drm.join("Project-Win64-Shipping.exe"), vec![0u8; 64]).unwrap();
    fixture
}

#[test]
fn playtester_is_rejected_with_full_configuration() {
    let fixture = publishing_fixture();
    let dispatch = FakeDispatch::new(fixture.journal.clone());

    assert!(matches!(
        fixture.workspace().publish(&dispatch, BranchType::Playtester),
        Err(Error::PlaytesterRejected)
    ));
    assert!(!fixture.journal.contains_prefix("dispatch."));
}

#[test]
fn internal_publish_pushes_staged_build() {
    let fixture = publishing_fixture();
    let dispatch = FakeDispatch::new(fixture.journal.clone());

    let target = fixture.workspace().publish(&dispatch, BranchType::Internal).unwrap();
    assert!(target.ends_with("Project-Win64-Shipping.exe"));
    assert!(fixture.journal.contains("dispatch.push 9001 config.json StagedBuilds"));
    assert!(!dispatch.wrapped.get());
}

#[test]
fn oversized_executable_wraps_launcher_before_push() {
    let mut fixture = publishing_fixture();
    fixture.config.dispatch.apply_drm = true;
    let exe = fixture
        .root()
        .join(&fixture.config.dispatch.drm)
        .join("Project-Win64-Shipping.exe");
    std::fs::File::create(&exe)
        .unwrap()
        .set_len(150 * 1024 * 1024)
        .unwrap();
    let dispatch = FakeDispatch::new(fixture.journal.clone());

    let target = fixture.workspace().publish(&dispatch, BranchType::Internal).unwrap();
    assert_eq!(target, fixture.root().join("Saved/StagedBuilds/Project.exe"));

    let wrap = fixture.journal.position("dispatch.drm_wrap 480 Project.exe").unwrap();
    let push = fixture
        .journal
        .position("dispatch.push 9001 config.json StagedBuilds")
        .unwrap();
    assert!(wrap < push);
}

#[test]
fn publish_without_ids_is_configuration_error() {
    let mut fixture = publishing_fixture();
    fixture.user.dispatch.internal_bid = None;
    let dispatch = FakeDispatch::new(fixture.journal.clone());

    let err = fixture.workspace().publish(&dispatch, BranchType::Internal).unwrap_err();
    assert!(matches!(err, Error::SettingMissing { .. }));
    assert!(err.to_string().contains("dispatch.internal_bid"));
}

#[test]
fn publish_tool_failure_is_reported() {
    let fixture = publishing_fixture();
    let mut dispatch = FakeDispatch::new(fixture.journal.clone());
    dispatch.push_code = 2;

    assert!(matches!(
        fixture.workspace().publish(&dispatch, BranchType::Internal),
        Err(Error::PublishFailed { code: 2 })
    ));
}

#[test]
fn publish_without_executable_fails() {
    let fixture = Fixture::new("dev", "dev");
    let mut fixture = fixture;
    fixture.user.dispatch.app_id = Some("480".into());
    fixture.user.dispatch.internal_bid = Some("9001".into());
    let dispatch = FakeDispatch::new(fixture.journal.clone());

    assert!(matches!(
        fixture.workspace().publish(&dispatch, BranchType::Internal),
        Err(Error::ExecutableNotFound { .. })
    ));
}
