/*!
 * Collections
 * Thread-safe hand-off containers
 */

mod drain;
mod list;

pub use list::ConcurrentList;
