pub mod client;
pub mod arrival_stream;
pub mod classifier;
pub mod present_queue;
pub mod server;
pub mod file_logger;

use self::client::Client;

pub trait Queue {
    fn arrival        (&mut self, client: Client);
    fn read_next_exit (&self) -> Option<&Client>;
    fn pop_next_exit  (&mut self) -> Option<Client>;
    fn read_load      (&self) -> usize;
}
