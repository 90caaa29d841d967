//! Unit tests for domain routing across hosts file, certificates and workspace.

#![allow(clippy::expect_used)]

use std::path::Path;

use blip_cli::application::ToolHandle;
use blip_cli::application::services::routing::DomainRouter;
use blip_cli::domain::config::MachineConfiguration;
use blip_cli::domain::machine::MachineSize;
use blip_cli::domain::{ValidationError, WorkspaceConfig, WorkspaceError, WorkspaceMachine};

use crate::helpers::machine_env_dump;
use crate::mocks::{
    MemoryFs, MemoryWorkspaceStore, MockSudo, RecordingIssuer, RecordingReporter, ScriptedRunner,
};

const HOSTS: &str = "/etc/hosts";
const WS_FILE: &str = "/ws/blip.yml";
const WEB_IP: &str = "192.168.99.100";

fn machine(domains: &[&str]) -> WorkspaceMachine {
    WorkspaceMachine {
        domains: domains.iter().map(ToString::to_string).collect(),
        configuration: MachineConfiguration::from(MachineSize::default()),
        driver: "virtualbox".to_string(),
        attached: false,
    }
}

fn workspace(machines: Vec<(&str, Vec<&str>)>) -> WorkspaceConfig {
    let mut config = WorkspaceConfig::new("0.1.0");
    config.default_machine = machines.first().map(|(name, _)| (*name).to_string());
    for (name, domains) in machines {
        config.machines.insert(name.to_string(), machine(&domains));
    }
    config
}

fn workspace_fs(hosts: &str) -> MemoryFs {
    MemoryFs::new()
        .with_file(WS_FILE, "")
        .with_dir("/ws/.blip")
        .with_file(HOSTS, hosts)
}

fn machine_runner() -> ScriptedRunner {
    ScriptedRunner::new()
        .with_tools()
        .ok("docker-machine", &["env", "web"], &machine_env_dump("web", WEB_IP))
        .ok("docker-machine", &["env", "db"], &machine_env_dump("db", "192.168.99.101"))
}

struct Fixture {
    runner: ScriptedRunner,
    fs: MemoryFs,
    sudo: MockSudo,
    store: MemoryWorkspaceStore,
    issuer: RecordingIssuer,
    tool: ToolHandle,
}

impl Fixture {
    fn new(fs: MemoryFs, config: WorkspaceConfig) -> Self {
        Self {
            runner: machine_runner(),
            fs,
            sudo: MockSudo::unused(),
            store: MemoryWorkspaceStore::with(WS_FILE, config),
            issuer: RecordingIssuer::default(),
            tool: ToolHandle::docker_machine(),
        }
    }

    fn router(
        &self,
    ) -> DomainRouter<
        '_,
        ScriptedRunner,
        MemoryFs,
        MockSudo,
        MemoryWorkspaceStore,
        RecordingIssuer,
        RecordingReporter,
    > {
        DomainRouter {
            runner: &self.runner,
            fs: &self.fs,
            sudo: &self.sudo,
            store: &self.store,
            issuer: &self.issuer,
            reporter: RecordingReporter::default(),
            machine_tool: &self.tool,
            hosts_path: Path::new(HOSTS),
            cwd: Path::new("/ws"),
        }
    }

    fn saved(&self) -> WorkspaceConfig {
        self.store.get(WS_FILE).expect("workspace saved")
    }
}

// ── bind_domain ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn bind_maps_domain_issues_certificate_and_records_it() {
    let fx = Fixture::new(
        workspace_fs("127.0.0.1 localhost\n"),
        workspace(vec![("web", vec![])]),
    );
    let router = fx.router();

    let outcome = router
        .bind_domain(None, "app.blip.test")
        .await
        .expect("bind succeeds");

    assert_eq!(outcome.machine, "web");
    assert_eq!(outcome.address, WEB_IP);
    assert_eq!(outcome.replaced, None);
    assert!(outcome.certificate_issued);

    let hosts = fx.fs.file(HOSTS).expect("hosts file");
    assert!(hosts.contains("\t192.168.99.100\tapp.blip.test\n"), "got: {hosts}");
    assert_eq!(fx.issuer.domains(), ["app.blip.test"]);
    assert_eq!(
        fx.issuer.issued.lock().expect("issued lock")[0].1,
        Path::new("/ws/.blip/certs")
    );
    assert_eq!(fx.saved().machines["web"].domains, ["app.blip.test"]);
    let messages = router.reporter.messages();
    assert!(messages[0].starts_with("step: mapping app.blip.test"), "got: {messages:?}");
    assert!(
        messages[1].starts_with("step: issuing certificate for app.blip.test"),
        "got: {messages:?}"
    );
}

#[tokio::test]
async fn bind_moves_domain_between_machines() {
    let fx = Fixture::new(
        workspace_fs("192.168.99.100 app.blip.test\n"),
        workspace(vec![("web", vec!["app.blip.test"]), ("db", vec![])]),
    );
    let router = fx.router();

    let outcome = router
        .bind_domain(Some("db"), "app.blip.test")
        .await
        .expect("bind succeeds");

    assert_eq!(outcome.address, "192.168.99.101");
    assert_eq!(outcome.replaced.as_deref(), Some(WEB_IP));
    let hosts = fx.fs.file(HOSTS).expect("hosts file");
    assert!(hosts.contains("\t192.168.99.101\tapp.blip.test\n"), "got: {hosts}");
    assert!(!hosts.contains(WEB_IP), "got: {hosts}");

    let saved = fx.saved();
    assert!(saved.machines["web"].domains.is_empty());
    assert_eq!(saved.machines["db"].domains, ["app.blip.test"]);
    assert!(router.reporter.messages()[0].starts_with("warn: app.blip.test pointed at"));
}

#[tokio::test]
async fn bind_takes_domain_off_a_shadowing_alias_line() {
    let fx = Fixture::new(
        workspace_fs("127.0.0.1 localhost app.blip.test\n"),
        workspace(vec![("web", vec![])]),
    );
    let router = fx.router();

    let outcome = router
        .bind_domain(None, "app.blip.test")
        .await
        .expect("bind succeeds");

    assert_eq!(outcome.replaced.as_deref(), Some("127.0.0.1"));
    assert_eq!(
        fx.fs.file(HOSTS).expect("hosts file"),
        "\t192.168.99.100\tapp.blip.test\n\t127.0.0.1\tlocalhost\n"
    );
    assert!(router.reporter.messages()[0].starts_with("warn: app.blip.test pointed at 127.0.0.1"));
}

#[tokio::test]
async fn bind_keeps_existing_mapping_and_certificate() {
    let fs = workspace_fs("192.168.99.100 app.blip.test\n")
        .with_file("/ws/.blip/certs/app.blip.test.key", "key")
        .with_file("/ws/.blip/certs/app.blip.test.crt", "crt");
    let fx = Fixture::new(fs, workspace(vec![("web", vec!["app.blip.test"])]));
    let router = fx.router();

    let outcome = router
        .bind_domain(None, "app.blip.test")
        .await
        .expect("bind succeeds");

    assert!(!outcome.certificate_issued);
    assert!(fx.issuer.domains().is_empty());
    // No flush: the file keeps its original spacing.
    assert_eq!(
        fx.fs.file(HOSTS).expect("hosts file"),
        "192.168.99.100 app.blip.test\n"
    );
    assert_eq!(fx.saved().machines["web"].domains, ["app.blip.test"]);
    assert!(router.reporter.messages().is_empty());
}

#[tokio::test]
async fn bind_rejects_invalid_domain_before_any_work() {
    let fx = Fixture::new(workspace_fs(""), workspace(vec![("web", vec![])]));

    let err = fx
        .router()
        .bind_domain(None, "-bad-.test")
        .await
        .expect_err("invalid domain");

    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::InvalidDomain(_))
    ));
    assert!(fx.runner.calls().is_empty());
}

#[tokio::test]
async fn bind_unknown_machine_fails_before_invoking_tools() {
    let fx = Fixture::new(workspace_fs(""), workspace(vec![("web", vec![])]));

    let err = fx
        .router()
        .bind_domain(Some("ghost"), "app.blip.test")
        .await
        .expect_err("unknown machine");

    assert!(matches!(
        err.downcast_ref::<WorkspaceError>(),
        Some(WorkspaceError::MachineNotFound(_))
    ));
    assert!(fx.runner.calls().is_empty());
}

#[tokio::test]
async fn bind_outside_workspace_fails() {
    let fs = MemoryFs::new().with_file(HOSTS, "");
    let fx = Fixture::new(fs, workspace(vec![("web", vec![])]));

    let err = fx
        .router()
        .bind_domain(None, "app.blip.test")
        .await
        .expect_err("not a workspace");

    assert!(matches!(
        err.downcast_ref::<WorkspaceError>(),
        Some(WorkspaceError::NotAWorkspace)
    ));
}

#[tokio::test]
async fn bind_without_docker_host_address_fails() {
    let mut fx = Fixture::new(workspace_fs(""), workspace(vec![("web", vec![])]));
    fx.runner = ScriptedRunner::new().with_tools().ok(
        "docker-machine",
        &["env", "web"],
        "export DOCKER_HOST=\"unix:///var/run/docker.sock\"\n",
    );

    let err = fx
        .router()
        .bind_domain(None, "app.blip.test")
        .await
        .expect_err("no address");

    assert!(matches!(
        err.downcast_ref::<WorkspaceError>(),
        Some(WorkspaceError::NoMachineAddress(name)) if name == "web"
    ));
    assert_eq!(fx.fs.file(HOSTS).as_deref(), Some(""));
}

// ── unbind_domain ────────────────────────────────────────────────────────────

#[tokio::test]
async fn unbind_removes_hosts_entry_and_workspace_record() {
    let fx = Fixture::new(
        workspace_fs("127.0.0.1 localhost\n192.168.99.100 app.blip.test\n"),
        workspace(vec![("web", vec!["app.blip.test", "api.blip.test"])]),
    );

    let removed = fx
        .router()
        .unbind_domain("app.blip.test")
        .await
        .expect("unbind succeeds");

    assert!(removed);
    let hosts = fx.fs.file(HOSTS).expect("hosts file");
    assert!(!hosts.contains("app.blip.test"), "got: {hosts}");
    assert!(hosts.contains("localhost"));
    assert_eq!(fx.saved().machines["web"].domains, ["api.blip.test"]);
}

#[tokio::test]
async fn unbind_unknown_domain_reports_false() {
    let fx = Fixture::new(
        workspace_fs("127.0.0.1 localhost\n"),
        workspace(vec![("web", vec![])]),
    );

    let removed = fx
        .router()
        .unbind_domain("ghost.blip.test")
        .await
        .expect("unbind succeeds");

    assert!(!removed);
    assert_eq!(
        fx.fs.file(HOSTS).expect("hosts file"),
        "127.0.0.1 localhost\n"
    );
}

// ── forget_machine ───────────────────────────────────────────────────────────

#[tokio::test]
async fn forget_machine_unmaps_domains_and_clears_default() {
    let fx = Fixture::new(
        workspace_fs("192.168.99.100 app.blip.test\n192.168.99.101 db.blip.test\n"),
        workspace(vec![("web", vec!["app.blip.test"]), ("db", vec!["db.blip.test"])]),
    );

    let unmapped = fx
        .router()
        .forget_machine("web")
        .await
        .expect("forget succeeds");

    assert_eq!(unmapped, ["app.blip.test"]);
    let saved = fx.saved();
    assert!(!saved.machines.contains_key("web"));
    assert_eq!(saved.default_machine, None);
    let hosts = fx.fs.file(HOSTS).expect("hosts file");
    assert!(!hosts.contains("app.blip.test"));
    assert!(hosts.contains("db.blip.test"));
    assert!(fx.runner.calls().is_empty());
}

#[tokio::test]
async fn forget_unknown_machine_changes_nothing() {
    let fx = Fixture::new(workspace_fs(""), workspace(vec![("web", vec![])]));

    let unmapped = fx
        .router()
        .forget_machine("ghost")
        .await
        .expect("forget succeeds");

    assert!(unmapped.is_empty());
    assert_eq!(fx.saved().default_machine.as_deref(), Some("web"));
}
