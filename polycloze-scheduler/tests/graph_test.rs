use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use polycloze_scheduler::{Graph, Task, TaskId};

struct RecordingTask {
    id: TaskId,
    inputs: Vec<PathBuf>,
    outputs: Vec<PathBuf>,
    run_count: Arc<AtomicUsize>,
}

impl Task for RecordingTask {
    fn id(&self) -> TaskId {
        self.id.clone()
    }

    fn inputs(&self) -> Vec<PathBuf> {
        self.inputs.clone()
    }

    fn outputs(&self) -> Vec<PathBuf> {
        self.outputs.clone()
    }

    fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.run_count.fetch_add(1, Ordering::SeqCst);
        for output in &self.outputs {
            fs::write(output, "done")?;
        }
        Ok(())
    }
}

#[test]
fn diamond_dependency_runs_each_task_once_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let root_in = dir.path().join("root.in");
    fs::write(&root_in, "seed").unwrap();

    let a_out = dir.path().join("a.out");
    let b_out = dir.path().join("b.out");
    let c_out = dir.path().join("c.out");

    let a_count = Arc::new(AtomicUsize::new(0));
    let b_count = Arc::new(AtomicUsize::new(0));
    let c_count = Arc::new(AtomicUsize::new(0));

    let mut graph = Graph::new(false);
    graph.add(
        Box::new(RecordingTask {
            id: TaskId::DecompressSentences,
            inputs: vec![root_in.clone()],
            outputs: vec![a_out.clone()],
            run_count: a_count.clone(),
        }),
        vec![],
    );
    graph.add(
        Box::new(RecordingTask {
            id: TaskId::TokenizeLanguage("eng".into()),
            inputs: vec![a_out.clone()],
            outputs: vec![b_out.clone()],
            run_count: b_count.clone(),
        }),
        vec![TaskId::DecompressSentences],
    );
    graph.add(
        Box::new(RecordingTask {
            id: TaskId::TokenizeLanguage("spa".into()),
            inputs: vec![a_out.clone()],
            outputs: vec![c_out.clone()],
            run_count: c_count.clone(),
        }),
        vec![TaskId::DecompressSentences],
    );
    graph.add(
        Box::new(RecordingTask {
            id: TaskId::BuildCourse("eng".into(), "spa".into()),
            inputs: vec![b_out, c_out],
            outputs: vec![dir.path().join("course.db")],
            run_count: Arc::new(AtomicUsize::new(0)),
        }),
        vec![TaskId::TokenizeLanguage("eng".into()), TaskId::TokenizeLanguage("spa".into())],
    );

    let summary = graph.execute(4).unwrap();

    assert_eq!(a_count.load(Ordering::SeqCst), 1);
    assert_eq!(b_count.load(Ordering::SeqCst), 1);
    assert_eq!(c_count.load(Ordering::SeqCst), 1);
    assert_eq!(summary.ran().count(), 4);

    let positions: Vec<&TaskId> = summary.tasks.iter().map(|t| &t.id).collect();
    let decompress_pos = positions.iter().position(|id| **id == TaskId::DecompressSentences).unwrap();
    let build_pos = positions.iter().position(|id| **id == TaskId::BuildCourse("eng".into(), "spa".into())).unwrap();
    assert!(decompress_pos < build_pos);
}

#[test]
fn up_to_date_task_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    fs::write(&input, "a").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(10));
    let output = dir.path().join("out.txt");
    fs::write(&output, "b").unwrap();

    let run_count = Arc::new(AtomicUsize::new(0));
    let mut graph = Graph::new(false);
    graph.add(
        Box::new(RecordingTask {
            id: TaskId::DecompressSentences,
            inputs: vec![input],
            outputs: vec![output],
            run_count: run_count.clone(),
        }),
        vec![],
    );

    let summary = graph.execute(2).unwrap();
    assert_eq!(run_count.load(Ordering::SeqCst), 0);
    assert_eq!(summary.skipped().count(), 1);
}

#[test]
fn force_rebuild_reruns_up_to_date_task() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    fs::write(&input, "a").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(10));
    let output = dir.path().join("out.txt");
    fs::write(&output, "b").unwrap();

    let run_count = Arc::new(AtomicUsize::new(0));
    let mut graph = Graph::new(true);
    graph.add(
        Box::new(RecordingTask {
            id: TaskId::DecompressSentences,
            inputs: vec![input],
            outputs: vec![output],
            run_count: run_count.clone(),
        }),
        vec![],
    );

    let summary = graph.execute(2).unwrap();
    assert_eq!(run_count.load(Ordering::SeqCst), 1);
    assert_eq!(summary.ran().count(), 1);
}

#[test]
fn failing_task_reports_its_id_and_stops_unstarted_dependents() {
    struct FailingTask;
    impl Task for FailingTask {
        fn id(&self) -> TaskId {
            TaskId::DecompressLinks
        }
        fn inputs(&self) -> Vec<PathBuf> {
            vec![]
        }
        fn outputs(&self) -> Vec<PathBuf> {
            vec![PathBuf::from("/nonexistent/does-not-exist.out")]
        }
        fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err("deliberate failure".into())
        }
    }

    let downstream_ran = Arc::new(AtomicUsize::new(0));
    let mut graph = Graph::new(false);
    graph.add(Box::new(FailingTask), vec![]);
    graph.add(
        Box::new(RecordingTask {
            id: TaskId::PartitionLinks,
            inputs: vec![PathBuf::from("/nonexistent/does-not-exist.out")],
            outputs: vec![PathBuf::from("/nonexistent/also-missing.out")],
            run_count: downstream_ran.clone(),
        }),
        vec![TaskId::DecompressLinks],
    );

    let err = graph.execute(2).unwrap_err();
    match err {
        polycloze_scheduler::SchedulerError::TaskFailed { id, .. } => {
            assert_eq!(id, TaskId::DecompressLinks);
        }
        other => panic!("expected TaskFailed, got {other:?}"),
    }
    assert_eq!(downstream_ran.load(Ordering::SeqCst), 0);
}
