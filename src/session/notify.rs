use std::io::Write;

use crate::model::task::Task;

/// Side effect fired once for every successfully added task
pub trait Notifier {
    fn task_added(&mut self, task: &Task);
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn task_added(&mut self, task: &Task) {
        (**self).task_added(task)
    }
}

/// Does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn task_added(&mut self, _task: &Task) {}
}

/// Rings the terminal bell on stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct Bell;

impl Notifier for Bell {
    fn task_added(&mut self, _task: &Task) {
        let mut err = std::io::stderr();
        let _ = err.write_all(b"\x07");
        let _ = err.flush();
    }
}

/// Picks `Bell` or `Silent` from the `notify.bell` setting
pub fn from_config(bell: bool) -> Box<dyn Notifier> {
    if bell { Box::new(Bell) } else { Box::new(Silent) }
}
