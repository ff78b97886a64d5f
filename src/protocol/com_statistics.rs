use super::capabilities::Capabilities;
use super::encode::Encode;

/// `COM_STATISTICS` (0x09): asks the server for a human-readable status
/// line (uptime, threads, queries/sec) used by `Connection::getStatistics`
/// (§6). The response is a single plain-text packet, not an OK/ERR/result
/// set, so it doesn't go through [`super::Response`].
#[derive(Debug, Default)]
pub(crate) struct ComStatistics;

impl Encode for ComStatistics {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.push(0x09);
    }
}
