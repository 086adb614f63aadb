//! Minimal in-process DNS server for exercising the upstream stage over
//! real sockets without leaving the host.

use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, SOA};
use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

/// How the mock answers incoming queries.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Answer every A query with this address and TTL.
    Answer(Ipv4Addr, u32),
    /// Answer NXDOMAIN with an SOA carrying this minimum TTL.
    NxDomain(u32),
    /// Answer SERVFAIL.
    ServFail,
    /// Consume queries without ever answering.
    Silent,
    /// Sleep, then answer.
    Delayed(Duration, Ipv4Addr, u32),
}

pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("bind mock dns server");
        let addr = socket.local_addr().expect("mock server local addr");
        let queries = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&queries);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 1500];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    break;
                };
                counter.fetch_add(1, Ordering::SeqCst);

                let reply = match &behavior {
                    MockBehavior::Silent => continue,
                    MockBehavior::Answer(ip, ttl) => build_answer(&buf[..len], *ip, *ttl),
                    MockBehavior::NxDomain(soa_minimum) => {
                        build_nxdomain(&buf[..len], *soa_minimum)
                    }
                    MockBehavior::ServFail => build_error(&buf[..len], ResponseCode::ServFail),
                    MockBehavior::Delayed(delay, ip, ttl) => {
                        tokio::time::sleep(*delay).await;
                        build_answer(&buf[..len], *ip, *ttl)
                    }
                };
                if let Some(reply) = reply {
                    let _ = socket.send_to(&reply, peer).await;
                }
            }
        });

        Self { addr, queries }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Endpoint string in the configuration syntax, e.g. `udp:127.0.0.1:40123`.
    pub fn endpoint(&self) -> String {
        format!("udp:{}", self.addr)
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

fn response_for(query: &[u8]) -> Option<(Message, Name)> {
    let request = Message::from_vec(query).ok()?;
    let question = request.queries().first()?.clone();
    let name = question.name().clone();

    let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
    response.set_recursion_desired(true);
    response.set_recursion_available(true);
    response.add_query(question);
    Some((response, name))
}

fn encode(message: &Message) -> Option<Vec<u8>> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).ok()?;
    Some(buf)
}

pub fn build_answer(query: &[u8], ip: Ipv4Addr, ttl: u32) -> Option<Vec<u8>> {
    let (mut response, name) = response_for(query)?;
    response.add_answer(Record::from_rdata(name, ttl, RData::A(A(ip))));
    encode(&response)
}

fn build_nxdomain(query: &[u8], soa_minimum: u32) -> Option<Vec<u8>> {
    let (mut response, name) = response_for(query)?;
    response.set_response_code(ResponseCode::NXDomain);

    let mname = Name::from_str("ns1.invalid.").ok()?;
    let rname = Name::from_str("hostmaster.invalid.").ok()?;
    let soa = SOA::new(mname, rname, 1, 7200, 900, 86400, soa_minimum);
    response.add_name_server(Record::from_rdata(name, soa_minimum, RData::SOA(soa)));
    encode(&response)
}

fn build_error(query: &[u8], rcode: ResponseCode) -> Option<Vec<u8>> {
    let (mut response, _) = response_for(query)?;
    response.set_response_code(rcode);
    encode(&response)
}
