//! Trace link state notifications from the routing subsystem.
//!
//! Subscribes to the link multicast group and prints every
//! notification as it arrives: the netlink header, the `ifinfomsg`
//! fields, the message type, the interface flags with changed bits
//! marked, and the interface name and address when the kernel
//! includes them. Runs until interrupted.

use std::process;

use log::debug;

use stadump::{
    consts::{
        nl::{NlFamily, Nlmsg},
        rtnl::RTMGRP_LINK,
    },
    err::Error,
    nl::NlMessageIter,
    rtnl::{self, LinkEvent},
    socket::{NlSocket, MAX_NL_LENGTH},
};

fn run() -> Result<(), Error> {
    let mut sock = NlSocket::connect(NlFamily::Route, RTMGRP_LINK)?;
    let mut buf = vec![0u8; MAX_NL_LENGTH];
    loop {
        let read = sock.recv(&mut buf)?;
        for msg in NlMessageIter::new(&buf[..read]) {
            let mut out = String::new();
            rtnl::render_message_line(&msg.header, &mut out);
            print!("{}", out);

            match Nlmsg::from(msg.header.nl_type) {
                Nlmsg::Done => return Ok(()),
                Nlmsg::Error => continue,
                _ => {}
            }

            let event = match LinkEvent::decode(&msg) {
                Ok(event) => event,
                Err(err) => {
                    debug!("skipping link message with short payload: {}", err);
                    continue;
                }
            };
            let mut out = String::new();
            event.render(&mut out);
            print!("{}", out);
        }
    }
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
